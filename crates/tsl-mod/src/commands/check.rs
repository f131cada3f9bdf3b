use crate::commands::install::{describe_action, LoadedMod};
use crate::errors::CliError;
use crate::println_pad;
use camino::Utf8PathBuf;
use colored::Colorize;
use miette::Result;
use tsl_layout::{classify, fix, FixOutcome, Verdict};

pub struct CheckModArgs {
    pub path: String,
}

/// Report whether a mod archive or folder is installable, and how it would be fixed.
pub fn check_mod(args: CheckModArgs) -> Result<()> {
    let path = Utf8PathBuf::from(&args.path);
    let LoadedMod { mut tree, .. } = LoadedMod::load(&path)?;
    if tree.is_empty() {
        println_pad!("{} {}", "📦 Layout:".bright_blue().bold(), "empty".bright_red().bold());
        return Ok(());
    }

    let verdict = classify(&tree);
    let label = match verdict {
        Verdict::Valid => verdict.to_string().bright_green().bold(),
        Verdict::Fixable => verdict.to_string().bright_yellow().bold(),
        Verdict::Invalid => verdict.to_string().bright_red().bold(),
    };
    println_pad!("{} {}", "📦 Layout:".bright_blue().bold(), label);

    println_pad!("\n{}", "Top level:".bright_magenta().bold());
    for &child in tree.children(tree.root()) {
        let name = tree.name(child);
        if tree.is_dir(child) {
            println_pad!("   {} {}/", "•".bright_cyan(), name.bright_cyan());
        } else {
            println_pad!("   {} {}", "•".bright_cyan(), name);
        }
    }

    if verdict != Verdict::Fixable {
        return Ok(());
    }

    // Only the in-memory tree is rewritten here.
    match fix(&mut tree, None).map_err(CliError::from)? {
        FixOutcome::Fixed(action) => {
            println_pad!("\n{} {}", "🔧 Fix:".bright_yellow(), describe_action(action))
        }
        FixOutcome::ChoiceRequired(request) => {
            println_pad!("\n{} {}", "❓".bright_yellow(), request.prompt());
            for option in &request.options {
                println_pad!("   {} {}", "•".bright_cyan(), option);
            }
        }
        _ => println_pad!("\n{}", "No automatic fix applies".dimmed()),
    }
    Ok(())
}
