// Command abbreviation matching for the leadline CLI

/// Find all commands that start with the given prefix (case-insensitive)
pub fn find_matching_commands<'a>(prefix: &str, commands: &'a [&str]) -> Vec<&'a str> {
    let prefix_lower = prefix.to_lowercase();
    commands.iter()
        .filter(|cmd| cmd.to_lowercase().starts_with(&prefix_lower))
        .copied()
        .collect()
}

/// Find a unique command match for the given prefix
/// Returns Ok(command) if exactly one match, Err(matches) if ambiguous, Err(empty) if no match.
/// Exact matches win over prefix matches.
pub fn find_unique_command<'a>(prefix: &str, commands: &'a [&str]) -> Result<&'a str, Vec<&'a str>> {
    if let Some(exact) = commands.iter().find(|cmd| cmd.eq_ignore_ascii_case(prefix)) {
        return Ok(*exact);
    }

    let matches = find_matching_commands(prefix, commands);
    match matches.len() {
        1 => Ok(matches[0]),
        _ => Err(matches),
    }
}

/// Top-level commands
pub const TOP_LEVEL_COMMANDS: &[&str] = &[
    "timeline", "stages", "next", "update", "login", "logout", "whoami",
];

/// Expand an abbreviated command name in the first position.
/// Unknown words pass through untouched so clap can report them.
pub fn expand_command_abbreviations(mut args: Vec<String>) -> Result<Vec<String>, String> {
    let Some(first) = args.first() else {
        return Ok(args);
    };
    if first.starts_with('-') || first == "help" {
        return Ok(args);
    }

    match find_unique_command(first, TOP_LEVEL_COMMANDS) {
        Ok(full_cmd) => {
            args[0] = full_cmd.to_string();
            Ok(args)
        }
        Err(matches) if matches.is_empty() => Ok(args),
        Err(matches) => Err(format!(
            "Ambiguous command '{}'. Did you mean one of: {}?",
            first,
            matches.join(", ")
        )),
    }
}
