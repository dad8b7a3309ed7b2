//! CLI schema and command execution for the essencecalc binary.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use essencecalc_domain::{
    AbilityFilter, DomainError, EssencePath, Level, PathEssenceStatus, ToggleOutcome,
};
use essencecalc_shared::{AbilityView, CharacterSummary};
use thiserror::Error;

use crate::use_cases::{EssenceSession, SessionError};

#[derive(Parser, Debug)]
#[command(name = "essencecalc")]
#[command(about = "Essence path character build calculator")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
    /// Catalog file or directory (overrides ESSENCE_CATALOG_PATH)
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Saved character file (overrides ESSENCE_SNAPSHOT_PATH)
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Print JSON instead of text where a view is shown
    #[arg(long)]
    pub json: bool,

    /// Command to execute (defaults to `show`).
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Budget figures and selected abilities per path
    Show,
    /// Active essence status of every path
    Paths,
    /// Browse one path's abilities
    Path {
        path: EssencePath,
        /// all, active, passive, cantrip or spell
        #[arg(default_value = "all")]
        filter: AbilityFilter,
    },
    /// Select an ability
    Select { id: String },
    /// Deselect an ability, removing anything that depended on it
    Deselect { id: String },
    /// Select or deselect an ability
    Toggle { id: String },
    /// Change the character level (1-20)
    Level {
        #[arg(value_parser = clap::value_parser!(u8).range(1..=20))]
        level: u8,
    },
    /// Move a path's active essence marker
    Adjust {
        path: EssencePath,
        #[arg(allow_negative_numbers = true)]
        delta: i32,
    },
    /// Full rest: restore every path's active essence
    Rest,
    /// Mark every path's active essence as spent
    Clear,
    /// Start over at the default level
    Reset,
    /// Drop selections whose tier is no longer unlocked
    Revalidate,
    /// Write the character as JSON (`-` for stdout)
    Export { file: Option<PathBuf> },
    /// Replace the character with a JSON file
    Import { file: PathBuf },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Executes one command against the session and writes its output.
pub fn run(
    command: Command,
    session: &mut EssenceSession,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::Show => {
            let summary = session.summary();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
            } else {
                render_summary(&summary, out)?;
            }
            return Ok(());
        }
        Command::Paths => {
            let statuses: Vec<PathEssenceStatus> = EssencePath::ALL
                .into_iter()
                .map(|path| session.engine().path_status(path))
                .collect();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&statuses)?)?;
            } else {
                for status in &statuses {
                    render_path_status(session, status, out)?;
                }
            }
            return Ok(());
        }
        Command::Path { path, filter } => {
            let views = AbilityView::list(session.engine(), path, filter);
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&views)?)?;
            } else {
                render_path(path, &views, out)?;
            }
            return Ok(());
        }
        Command::Select { id } => {
            session.select(&id)?;
            writeln!(out, "Selected {}", id)?;
        }
        Command::Deselect { id } => match session.deselect(&id)? {
            Some(deselection) => {
                writeln!(out, "Deselected {}", deselection.ability_id)?;
                for removed in &deselection.cascaded {
                    writeln!(out, "  also removed {}", removed)?;
                }
            }
            None => writeln!(out, "{} was not selected", id)?,
        },
        Command::Toggle { id } => match session.toggle(&id)? {
            ToggleOutcome::Selected(id) => writeln!(out, "Selected {}", id)?,
            ToggleOutcome::Deselected(deselection) => {
                writeln!(out, "Deselected {}", deselection.ability_id)?;
                for removed in &deselection.cascaded {
                    writeln!(out, "  also removed {}", removed)?;
                }
            }
        },
        Command::Level { level } => {
            let change = session.set_level(Level::new(level)?)?;
            writeln!(out, "Level {} -> {}", change.previous, change.current)?;
            for removed in &change.revalidation.removed {
                writeln!(out, "  removed {}", removed)?;
            }
        }
        Command::Adjust { path, delta } => {
            let value = session.adjust_active_essence(path, delta)?;
            let status = session.engine().path_status(path);
            writeln!(out, "{} active essence: {}/{}", path.display_name(), value, status.max)?;
        }
        Command::Rest => {
            session.restore_all()?;
            writeln!(out, "Active essence restored")?;
        }
        Command::Clear => {
            session.clear_all()?;
            writeln!(out, "Active essence cleared")?;
        }
        Command::Reset => {
            session.reset()?;
            writeln!(out, "Character reset")?;
        }
        Command::Revalidate => {
            let revalidation = session.revalidate()?;
            if revalidation.is_empty() {
                writeln!(out, "Every selection is valid")?;
            }
            for removed in &revalidation.removed {
                writeln!(out, "  removed {}", removed)?;
            }
            for unknown in &revalidation.unknown {
                writeln!(out, "  dropped unknown {}", unknown)?;
            }
        }
        Command::Export { file } => {
            let text = session.export_json()?;
            match file {
                Some(file) if file.as_os_str() == "-" => writeln!(out, "{}", text)?,
                file => {
                    let file =
                        file.unwrap_or_else(|| PathBuf::from(session.export_file_name()));
                    fs::write(&file, text)?;
                    writeln!(out, "Exported to {}", file.display())?;
                }
            }
            return Ok(());
        }
        Command::Import { file } => {
            let text = fs::read_to_string(&file)?;
            session.import_json(&text)?;
            writeln!(out, "Imported {}", file.display())?;
        }
    }

    render_budget(&session.summary(), out)?;
    Ok(())
}

fn render_budget(summary: &CharacterSummary, out: &mut dyn Write) -> std::io::Result<()> {
    let budget = &summary.budget;
    writeln!(
        out,
        "Level {} | points {}/{} | effective max {} | available {}",
        budget.level, budget.spent, budget.total_points, budget.effective_max, budget.available
    )
}

fn render_summary(summary: &CharacterSummary, out: &mut dyn Write) -> std::io::Result<()> {
    render_budget(summary, out)?;
    if summary.paths.is_empty() {
        return writeln!(out, "No abilities selected");
    }
    for path in &summary.paths {
        writeln!(
            out,
            "\n{} (active {}/{}, passive -{})",
            path.name, path.essence.spent, path.essence.max, path.essence.passive_reduction
        )?;
        for name in &path.selected {
            writeln!(out, "  {}", name)?;
        }
    }
    Ok(())
}

fn render_path_status(
    session: &EssenceSession,
    status: &PathEssenceStatus,
    out: &mut dyn Write,
) -> std::io::Result<()> {
    let abilities = session.engine().catalog().path_abilities(status.path).count();
    writeln!(
        out,
        "{:<10} {:>3} abilities  active {}/{}  passive -{}",
        status.path.display_name(),
        abilities,
        status.spent,
        status.max,
        status.passive_reduction
    )
}

fn render_path(path: EssencePath, views: &[AbilityView], out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "{}", path.display_name())?;
    if views.is_empty() {
        return writeln!(out, "  (no abilities)");
    }
    for view in views {
        let marker = if view.selected {
            "[x]"
        } else if view.locked {
            "[-]"
        } else {
            "[ ]"
        };
        writeln!(
            out,
            "{} {:<9} {:<8} {}  {}  {}",
            marker, view.tier, view.kind, view.cost, view.id, view.name
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::settings::EngineSettings;
    use crate::infrastructure::snapshot_store::InMemorySnapshotStore;
    use chrono::{TimeZone, Utc};
    use essencecalc_shared::parse_catalog;
    use serde_json::json;
    use std::sync::Arc;

    fn session(level: u8) -> EssenceSession {
        let doc = json!({
            "abilities": {
                "earth": [
                    { "id": "earth_active_earthen_ward", "name": "Earthen Ward", "tier": "initiate", "isActive": true },
                    { "id": "earth_adept_stone_skin", "name": "Stone Skin", "tier": "adept", "isActive": true }
                ]
            }
        });
        let catalog = parse_catalog(&doc.to_string()).expect("valid catalog");
        let now = Utc
            .with_ymd_and_hms(2025, 1, 2, 3, 4, 5)
            .single()
            .expect("valid time");
        let settings = EngineSettings {
            default_level: Level::new(level).expect("valid level"),
            ..EngineSettings::default()
        };
        EssenceSession::new(
            Arc::new(catalog),
            Arc::new(InMemorySnapshotStore::new()),
            Arc::new(FixedClock(now)),
            &settings,
        )
    }

    fn run_text(session: &mut EssenceSession, command: Command) -> String {
        let mut out = Vec::new();
        run(command, session, false, &mut out).expect("command runs");
        String::from_utf8(out).expect("utf8 output")
    }

    #[test]
    fn parses_commands() {
        let cli = Cli::try_parse_from(["essencecalc", "adjust", "earth", "-2"]).expect("parses");
        assert_eq!(
            cli.command,
            Some(Command::Adjust {
                path: EssencePath::Earth,
                delta: -2
            })
        );

        let cli = Cli::try_parse_from(["essencecalc", "--json", "path", "air"]).expect("parses");
        assert!(cli.json);
        assert_eq!(
            cli.command,
            Some(Command::Path {
                path: EssencePath::Wind,
                filter: AbilityFilter::All
            })
        );

        let cli = Cli::try_parse_from(["essencecalc"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(Cli::try_parse_from(["essencecalc", "level", "21"]).is_err());
        assert!(Cli::try_parse_from(["essencecalc", "path", "shadow"]).is_err());
        assert!(Cli::try_parse_from(["essencecalc", "path", "fire", "legendary"]).is_err());
    }

    #[test]
    fn select_then_deselect_reports_cascade() {
        let mut session = session(5);
        let output = run_text(
            &mut session,
            Command::Select {
                id: "earth_active_earthen_ward".into(),
            },
        );
        assert!(output.starts_with("Selected earth_active_earthen_ward"));
        assert!(output.contains("points 1/9"));

        run_text(
            &mut session,
            Command::Toggle {
                id: "earth_adept_stone_skin".into(),
            },
        );
        let output = run_text(
            &mut session,
            Command::Deselect {
                id: "earth_active_earthen_ward".into(),
            },
        );
        assert!(output.contains("also removed earth_adept_stone_skin"));
    }

    #[test]
    fn path_view_marks_locked_abilities() {
        let mut session = session(1);
        let output = run_text(
            &mut session,
            Command::Path {
                path: EssencePath::Earth,
                filter: AbilityFilter::Active,
            },
        );
        assert!(output.contains("[ ] initiate"));
        assert!(output.contains("[-] adept"));
    }

    #[test]
    fn locked_selection_is_an_error() {
        let mut session = session(1);
        let mut out = Vec::new();
        let err = run(
            Command::Select {
                id: "earth_adept_stone_skin".into(),
            },
            &mut session,
            false,
            &mut out,
        )
        .expect_err("locked");
        assert!(matches!(err, CliError::Session(_)));
    }

    #[test]
    fn export_and_import_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = dir.path().join("build.json");

        let mut source = session(9);
        run_text(
            &mut source,
            Command::Select {
                id: "earth_active_earthen_ward".into(),
            },
        );
        let output = run_text(
            &mut source,
            Command::Export {
                file: Some(file.clone()),
            },
        );
        assert!(output.contains("Exported to"));

        let mut target = session(1);
        run_text(&mut target, Command::Import { file });
        assert_eq!(target.engine().level().value(), 9);
        assert!(target.engine().is_selected("earth_active_earthen_ward"));
    }

    #[test]
    fn show_as_json() {
        let mut session = session(5);
        let mut out = Vec::new();
        run(Command::Show, &mut session, true, &mut out).expect("show");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("json output");
        assert_eq!(value["budget"]["totalPoints"], 9);
    }
}
