use crate::println_pad;
use crate::utils::{build_resolver, config};
use colored::{ColoredString, Colorize};
use miette::{IntoDiagnostic, Result};
use tsl_overlay::{ConflictSeverity, ListingRow};

pub struct TexturesArgs {
    pub json: bool,
    pub conflicts_only: bool,
}

fn colored_marker(row: &ListingRow) -> ColoredString {
    let marker = format!("{:<2}", row.marker());
    if row.hidden {
        return marker.dimmed();
    }
    match row.conflict {
        Some(ConflictSeverity::Major) => marker.bright_red().bold(),
        Some(ConflictSeverity::Minor) => marker.bright_yellow().bold(),
        Some(ConflictSeverity::Other) => marker.bright_blue(),
        None => marker.normal(),
    }
}

/// Print the merged texture overrides of the game and the active mods.
pub fn list_textures(args: TexturesArgs) -> Result<()> {
    let cfg = config::load_config();
    let listing = build_resolver(&cfg)?.resolve();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listing).into_diagnostic()?);
        return Ok(());
    }

    println_pad!("{}", listing.summary().to_string().bright_white().bold());
    if listing.shadowed() > 0 {
        println_pad!(
            "{}",
            format!("{} files shadowed by higher-priority mods", listing.shadowed()).dimmed()
        );
    }
    println!();

    for row in listing.rows() {
        if args.conflicts_only && row.conflict.is_none() {
            continue;
        }
        let path = if row.hidden {
            row.rel_path.dimmed()
        } else {
            row.rel_path.normal()
        };
        println_pad!(
            "{} {} {} {} {}",
            colored_marker(row),
            path,
            format!("[{}]", row.source).bright_cyan(),
            row.type_label().dimmed(),
            row.size_text().dimmed()
        );
    }
    Ok(())
}
