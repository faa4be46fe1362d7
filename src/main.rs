#![allow(dead_code)]

use crate::areas::repository::Repository;
use crate::artifacts::core::{UserError, user_error};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod areas;
mod artifacts;
mod commands;

const EMPTY_COMMAND_LINE: &str = "Please enter a command.";
const UNKNOWN_COMMAND: &str = "No command with that name exists.";
const INCORRECT_OPERANDS: &str = "Incorrect operands.";
const NOT_IN_REPOSITORY: &str = "Not in an initialized Gitlet directory.";

#[derive(Parser)]
#[command(
    name = "gitlet",
    version = "0.1.0",
    about = "A miniature version-control system",
    long_about = "Gitlet is a miniature version-control system modeled on a subset of git. \
    It records snapshots of the working directory as content-addressed commits, \
    supports branching and three-way merging, and keeps all state under a \
    .gitlet directory in the working directory.",
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "init", about = "Create a new repository in the current directory")]
    Init,
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1, value_name = "FILE")]
        file: String,
    },
    #[command(name = "commit", about = "Record the staged snapshot as a new commit")]
    Commit {
        #[arg(index = 1, value_name = "MESSAGE")]
        message: String,
    },
    #[command(name = "rm", about = "Unstage a file, or stage it for removal")]
    Rm {
        #[arg(index = 1, value_name = "FILE")]
        file: String,
    },
    #[command(name = "log", about = "Show the first-parent history of the head commit")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "List ids of commits with the given message")]
    Find {
        #[arg(index = 1, value_name = "MESSAGE")]
        message: String,
    },
    #[command(name = "status", about = "Show branches and the working tree status")]
    Status,
    #[command(
        name = "checkout",
        about = "Restore a file or switch branches",
        long_about = "Three forms: `checkout -- <file>` restores the head commit's version \
        of a file, `checkout <commit id> -- <file>` restores the version in the given \
        commit, and `checkout <branch>` switches to a branch."
    )]
    Checkout {
        #[arg(num_args = 1..=2, value_name = "ARGS")]
        args: Vec<String>,
    },
    #[command(name = "branch", about = "Create a branch pointing at the head commit")]
    Branch {
        #[arg(index = 1, value_name = "NAME")]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1, value_name = "NAME")]
        name: String,
    },
    #[command(name = "reset", about = "Check out a commit and move the current branch to it")]
    Reset {
        #[arg(index = 1, value_name = "COMMIT_ID")]
        commit_id: String,
    },
    #[command(name = "merge", about = "Merge the given branch into the current branch")]
    Merge {
        #[arg(index = 1, value_name = "BRANCH")]
        branch: String,
    },
}

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    if argv.is_empty() {
        println!("{}", EMPTY_COMMAND_LINE);
        return ExitCode::SUCCESS;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return report_parse_error(error),
    };

    match run(&cli, &argv) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => match error.downcast_ref::<UserError>() {
            // prescribed one-line failures go to stdout with a clean exit
            Some(user_failure) => {
                println!("{}", user_failure);
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("gitlet: {:#}", error);
                ExitCode::FAILURE
            }
        },
    }
}

fn report_parse_error(error: clap::Error) -> ExitCode {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = error.print();
            ExitCode::SUCCESS
        }
        ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            println!("{}", EMPTY_COMMAND_LINE);
            ExitCode::SUCCESS
        }
        ErrorKind::InvalidSubcommand => {
            println!("{}", UNKNOWN_COMMAND);
            ExitCode::SUCCESS
        }
        _ => {
            println!("{}", INCORRECT_OPERANDS);
            ExitCode::SUCCESS
        }
    }
}

fn run(cli: &Cli, argv: &[String]) -> anyhow::Result<()> {
    let pwd = std::env::current_dir()?;
    let mut repository = Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))?;

    if !matches!(cli.command, Commands::Init) && !repository.is_initialized() {
        return Err(user_error(NOT_IN_REPOSITORY));
    }

    match &cli.command {
        Commands::Init => repository.init(),
        Commands::Add { file } => repository.add(file),
        Commands::Commit { message } => repository.commit(message),
        Commands::Rm { file } => repository.rm(file),
        Commands::Log => repository.log(),
        Commands::GlobalLog => repository.global_log(),
        Commands::Find { message } => repository.find(message),
        Commands::Status => repository.status(),
        Commands::Checkout { args } => dispatch_checkout(&mut repository, args, argv),
        Commands::Branch { name } => repository.branch(name),
        Commands::RmBranch { name } => repository.rm_branch(name),
        Commands::Reset { commit_id } => repository.reset(commit_id),
        Commands::Merge { branch } => repository.merge(branch),
    }
}

/// Disambiguate the three checkout forms.
///
/// Clap consumes the literal `--` as its escape token, so the raw argv is
/// consulted to tell `checkout <branch>` from `checkout -- <file>` and to
/// verify the separator's position in `checkout <commit id> -- <file>`.
fn dispatch_checkout(
    repository: &mut Repository,
    args: &[String],
    argv: &[String],
) -> anyhow::Result<()> {
    match (argv.len(), args.len()) {
        (2, 1) if argv[1] != "--" => repository.checkout_branch(&args[0]),
        (3, 1) if argv[1] == "--" => repository.checkout_file(&args[0]),
        (4, 2) if argv[2] == "--" => repository.checkout_file_from_commit(&args[0], &args[1]),
        _ => Err(user_error(INCORRECT_OPERANDS)),
    }
}
