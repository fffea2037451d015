//! Prompt Registry - static catalog of all prompts.
//!
//! Each prompt describes a guided interaction with one of the tools: it
//! declares its arguments, renders a user message, and names the tool that
//! `prompts/execute` dispatches to.

use std::collections::HashMap;

/// Argument descriptor for a prompt.
pub struct ArgSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// A registered prompt.
pub struct PromptSpec {
    /// Prompt name as exposed to clients.
    pub name: &'static str,

    /// Human-readable description.
    pub description: &'static str,

    /// The tool this prompt maps to for `prompts/execute`.
    pub tool: &'static str,

    /// Prompt arguments whose names differ from the tool's parameter names,
    /// as (prompt argument, tool parameter) pairs applied when dispatching.
    pub arg_renames: &'static [(&'static str, &'static str)],

    /// Declared arguments.
    pub arguments: &'static [ArgSpec],

    /// Renders the user message from the supplied arguments.
    pub render: fn(&HashMap<String, String>) -> String,
}

/// All registered prompts.
pub fn all_prompts() -> &'static [PromptSpec] {
    &PROMPTS
}

/// Names of all registered prompts.
pub fn prompt_names() -> Vec<&'static str> {
    PROMPTS.iter().map(|p| p.name).collect()
}

static PROMPTS: [PromptSpec; 6] = [
    PromptSpec {
        name: "nasa/get-astronomy-picture",
        description: "Fetch NASA's Astronomy Picture of the Day, optionally for a specific date",
        tool: "nasa/apod",
        arg_renames: &[],
        arguments: &[ArgSpec {
            name: "date",
            description: "Date of the picture (YYYY-MM-DD). Defaults to today",
            required: false,
        }],
        render: render_apod,
    },
    PromptSpec {
        name: "nasa/browse-near-earth-objects",
        description: "Browse asteroids making close approaches to Earth in a date range",
        tool: "nasa/neo",
        arg_renames: &[],
        arguments: &[
            ArgSpec {
                name: "start_date",
                description: "Start of the date range (YYYY-MM-DD)",
                required: true,
            },
            ArgSpec {
                name: "end_date",
                description: "End of the date range (YYYY-MM-DD). Defaults to start_date",
                required: false,
            },
        ],
        render: render_neo,
    },
    PromptSpec {
        name: "nasa/view-epic-imagery",
        description: "View whole-Earth imagery from the EPIC camera on DSCOVR",
        tool: "nasa/epic",
        arg_renames: &[],
        arguments: &[
            ArgSpec {
                name: "collection",
                description: "Image collection: 'natural' or 'enhanced'",
                required: false,
            },
            ArgSpec {
                name: "date",
                description: "Date of the imagery (YYYY-MM-DD). Defaults to the most recent",
                required: false,
            },
        ],
        render: render_epic,
    },
    PromptSpec {
        name: "jpl/query-small-body-database",
        description: "Look up orbital and physical data for an asteroid or comet",
        tool: "jpl/sbdb",
        arg_renames: &[("object", "sstr")],
        arguments: &[ArgSpec {
            name: "object",
            description: "Object name, designation, or SPK-ID (e.g. 'Ceres', '433')",
            required: true,
        }],
        render: render_sbdb,
    },
    PromptSpec {
        name: "jpl/find-close-approaches",
        description: "Find asteroid and comet close approaches to Earth",
        tool: "jpl/cad",
        arg_renames: &[],
        arguments: &[
            ArgSpec {
                name: "date_min",
                description: "Earliest approach date (YYYY-MM-DD)",
                required: false,
            },
            ArgSpec {
                name: "date_max",
                description: "Latest approach date (YYYY-MM-DD)",
                required: false,
            },
            ArgSpec {
                name: "dist_max",
                description: "Maximum approach distance in au (e.g. '0.05')",
                required: false,
            },
        ],
        render: render_cad,
    },
    PromptSpec {
        name: "jpl/get-fireball-data",
        description: "Retrieve fireball atmospheric-impact events recorded by US government sensors",
        tool: "jpl/fireball",
        arg_renames: &[],
        arguments: &[ArgSpec {
            name: "date_min",
            description: "Earliest event date (YYYY-MM-DD)",
            required: false,
        }],
        render: render_fireball,
    },
];

fn render_apod(args: &HashMap<String, String>) -> String {
    match args.get("date") {
        Some(date) => format!("Show me NASA's Astronomy Picture of the Day for {date}."),
        None => "Show me today's NASA Astronomy Picture of the Day.".to_string(),
    }
}

fn render_neo(args: &HashMap<String, String>) -> String {
    let start = args.get("start_date").map(String::as_str).unwrap_or("today");
    match args.get("end_date") {
        Some(end) => format!(
            "What near-Earth objects are making close approaches between {start} and {end}?"
        ),
        None => format!("What near-Earth objects are making close approaches on {start}?"),
    }
}

fn render_epic(args: &HashMap<String, String>) -> String {
    let collection = args.get("collection").map(String::as_str).unwrap_or("natural");
    match args.get("date") {
        Some(date) => format!("Show me {collection} EPIC imagery of Earth from {date}."),
        None => format!("Show me the most recent {collection} EPIC imagery of Earth."),
    }
}

fn render_sbdb(args: &HashMap<String, String>) -> String {
    let object = args.get("object").map(String::as_str).unwrap_or("");
    format!("Look up {object} in the JPL Small-Body Database and summarize its orbit.")
}

fn render_cad(args: &HashMap<String, String>) -> String {
    let mut message = String::from("Find asteroid close approaches to Earth");
    if let Some(min) = args.get("date_min") {
        message.push_str(&format!(" from {min}"));
    }
    if let Some(max) = args.get("date_max") {
        message.push_str(&format!(" until {max}"));
    }
    if let Some(dist) = args.get("dist_max") {
        message.push_str(&format!(" within {dist} au"));
    }
    message.push('.');
    message
}

fn render_fireball(args: &HashMap<String, String>) -> String {
    match args.get("date_min") {
        Some(date) => format!("Show me fireball events recorded since {date}."),
        None => "Show me recently recorded fireball events.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_complete() {
        let names = prompt_names();
        assert_eq!(names.len(), 6);
        assert!(names.contains(&"nasa/get-astronomy-picture"));
        assert!(names.contains(&"nasa/browse-near-earth-objects"));
        assert!(names.contains(&"nasa/view-epic-imagery"));
        assert!(names.contains(&"jpl/query-small-body-database"));
        assert!(names.contains(&"jpl/find-close-approaches"));
        assert!(names.contains(&"jpl/get-fireball-data"));
    }

    #[test]
    fn test_every_prompt_maps_to_a_domain_tool() {
        for prompt in all_prompts() {
            assert!(prompt.tool.contains('/'), "{} has no domain", prompt.tool);
        }
    }

    #[test]
    fn test_arg_renames_refer_to_declared_arguments() {
        for prompt in all_prompts() {
            for (from, _) in prompt.arg_renames {
                assert!(
                    prompt.arguments.iter().any(|a| a.name == *from),
                    "{} renames undeclared argument {}",
                    prompt.name,
                    from
                );
            }
        }
    }

    #[test]
    fn test_sbdb_prompt_renames_object_argument() {
        let sbdb = all_prompts()
            .iter()
            .find(|p| p.name == "jpl/query-small-body-database")
            .unwrap();
        assert_eq!(sbdb.arg_renames, &[("object", "sstr")]);
    }

    #[test]
    fn test_render_apod_with_date() {
        let mut args = HashMap::new();
        args.insert("date".to_string(), "2023-01-01".to_string());
        assert!(render_apod(&args).contains("2023-01-01"));
    }

    #[test]
    fn test_render_cad_combines_arguments() {
        let mut args = HashMap::new();
        args.insert("date_min".to_string(), "2024-01-01".to_string());
        args.insert("dist_max".to_string(), "0.05".to_string());
        let message = render_cad(&args);
        assert!(message.contains("2024-01-01"));
        assert!(message.contains("0.05"));
    }
}
