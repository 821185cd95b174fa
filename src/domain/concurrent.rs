//! Argument protocol of the external concurrent-process runner.

use super::executable::CommandGroup;

/// Prefix colors, assigned by entry position.
pub const PREFIX_COLORS: [&str; 8] =
    ["bgBlue", "bgGreen", "bgMagenta", "bgCyan", "bgWhite", "bgRed", "bgBlack", "bgYellow"];

/// Program name of the runner when it is not installed in the project.
pub const CONCURRENT_RUNNER: &str = "concurrently";

/// Build the runner's argument list for a group.
///
/// `[--kill-others-on-fail] --prefix [{name}] --names a,b --prefix-colors c1,c2 "cmd1" "cmd2"`
pub fn runner_args(group: &CommandGroup) -> Vec<String> {
    let entries = group.present_entries();

    let names = entries.iter().map(|(name, _)| *name).collect::<Vec<_>>().join(",");
    let colors = (0..entries.len())
        .map(|i| format!("{}.bold.reset", PREFIX_COLORS[i % PREFIX_COLORS.len()]))
        .collect::<Vec<_>>()
        .join(",");

    let mut args = Vec::with_capacity(entries.len() + 7);
    if group.kills_others_on_fail() {
        args.push("--kill-others-on-fail".to_string());
    }
    args.extend(
        ["--prefix", "[{name}]", "--names", names.as_str(), "--prefix-colors", colors.as_str()]
            .map(String::from),
    );
    args.extend(entries.iter().map(|(_, entry)| quote(&entry.command_line())));
    args
}

// JSON string quoting; the runner strips the surrounding quotes.
fn quote(command: &str) -> String {
    serde_json::Value::String(command.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Invocation;

    #[test]
    fn default_group_args_start_with_kill_flag() {
        let group = CommandGroup::new().with("a", "cmd1").with("b", "cmd2");

        assert_eq!(
            runner_args(&group),
            vec![
                "--kill-others-on-fail",
                "--prefix",
                "[{name}]",
                "--names",
                "a,b",
                "--prefix-colors",
                "bgBlue.bold.reset,bgGreen.bold.reset",
                "\"cmd1\"",
                "\"cmd2\"",
            ]
        );
    }

    #[test]
    fn kill_flag_can_be_disabled() {
        let group = CommandGroup::new().with("a", "cmd1").kill_others_on_fail(false);
        assert_eq!(runner_args(&group)[0], "--prefix");
    }

    #[test]
    fn invocations_are_joined_and_colors_cycle() {
        let mut group = CommandGroup::new();
        for i in 0..9 {
            group = group.with(format!("t{i}"), Invocation::new("echo", [i.to_string()]));
        }

        let args = runner_args(&group);
        let colors: Vec<&str> = args[6].split(',').collect();
        assert_eq!(colors.len(), 9);
        assert_eq!(colors[8], "bgBlue.bold.reset");
        assert_eq!(colors[7], "bgYellow.bold.reset");
        assert_eq!(args[7], "\"echo 0\"");
    }

    #[test]
    fn quotes_inside_commands_are_escaped() {
        let group = CommandGroup::new().with("doc", r#"typedoc --name "My Lib""#);
        assert_eq!(runner_args(&group).last().unwrap(), r#""typedoc --name \"My Lib\"""#);
    }
}
