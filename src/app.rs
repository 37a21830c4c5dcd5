//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands;
use crate::logging;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::process;

/// A terminal viewer for handwriting transcription with word-by-word reveal
#[derive(Parser)]
#[command(name = "scrive")]
#[command(version)]
#[command(about = "Upload a handwriting image and watch its transcription appear word by word")]
#[command(
    long_about = "A terminal viewer for handwriting transcription.\n\nUploads an image to a transcription service, animates the returned text\nword by word and can swap to the corrected version on request.\n\nDEFAULT COMMAND:\n    If no command is specified, 'view' is used by default.\n    An image path can be passed without explicitly saying 'view'.\n\nEXAMPLES:\n    # Open the interactive viewer\n    $ scrive\n    $ scrive page.png\n    \n    # Transcribe non-interactively and pipe the text\n    $ scrive transcribe page.png | wc -w\n    \n    # Transcribe and copy the corrected text to the clipboard\n    $ scrive transcribe page.png --corrected -c\n    \n    # Edit configuration file\n    $ scrive config"
)]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/scrive/scrive.toml\n    Logs:               ~/.local/state/scrive/scrive.log.*"
)]
struct Cli {
    /// Image file to open in the viewer (view default command)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive transcription viewer (default)
    ///
    /// Type or pass a path to a png/jpg/jpeg file, press Enter to transcribe,
    /// 'p' to show the corrected text, 'u' to upload another image.
    #[command(visible_alias = "v")]
    View {
        /// Image file to preselect
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Transcribe an image file without the interactive viewer
    ///
    /// Sends the image to the configured service and prints the transcription
    /// to stdout, suitable for piping to other commands.
    ///
    /// Examples:
    ///   scrive transcribe page.png
    ///   scrive transcribe note.jpg --corrected
    ///   scrive transcribe page.png -o transcript.txt
    ///   scrive transcribe page.png | grep keyword
    #[command(visible_alias = "t")]
    Transcribe {
        /// Path to the image file to transcribe
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output the corrected text instead of the raw transcription
        #[arg(long)]
        corrected: bool,

        /// Copy the text to clipboard instead of stdout
        #[arg(short, long)]
        clipboard: bool,

        /// Write the text to a file instead of stdout
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<String>,
    },

    /// Open configuration file in your preferred editor
    ///
    /// Edit the service endpoint, request timeout and reveal speed.
    /// Uses $EDITOR environment variable or falls back to nano/vi.
    #[command(visible_alias = "c")]
    Config,

    /// Show recent log entries from the application
    ///
    /// Display the last lines of the most recent log file.
    /// Useful for troubleshooting failed requests.
    Logs {
        /// Number of lines to show
        #[arg(short = 'n', long, value_name = "LINES")]
        lines: Option<usize>,
    },

    /// Generate shell completion script
    ///
    /// Generate completion script for your shell. Save the output to your
    /// shell's completion directory or source it directly.
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If command execution fails (e.g., configuration, transcription, viewer)
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Handle commands that don't need logging or config setup
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "scrive", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::Logs { lines }) => {
            return match commands::handle_logs(*lines) {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        _ => {}
    }

    // Initialize logging for all other commands
    logging::init_logging()?;

    // Route to appropriate command handler
    match cli.command {
        None | Some(Commands::View { .. }) => {
            // Default command is view
            // A top-level file argument is equivalent to 'view FILE'
            let file = match cli.command {
                Some(Commands::View { file }) => file,
                None => cli.file,
                _ => unreachable!(),
            };
            commands::handle_view(file).await?;
        }
        Some(Commands::Transcribe {
            file,
            corrected,
            clipboard,
            output,
        }) => {
            commands::handle_transcribe(file, corrected, clipboard, output).await?;
        }
        Some(Commands::Config) => {
            commands::handle_config()?;
        }
        Some(Commands::Completions { .. }) | Some(Commands::Logs { .. }) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}
