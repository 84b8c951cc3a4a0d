use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bank",
    about = "Chain bank: an account ledger over a key-value state store",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// State file backing the store
    #[arg(long, global = true, default_value = "bank-state.json")]
    pub store: PathBuf,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reset the account index to empty
    Init(InitArgs),
    /// Create an account and add it to the index
    MakeAccount(MakeAccountArgs),
    /// Add to an account balance
    Deposit(AmountArgs),
    /// Subtract from an account balance (may go negative)
    Withdrawal(AmountArgs),
    /// Print the stored record of one account
    Read(ReadArgs),
    /// Print every indexed account record
    SeeAll,
    /// Fork-join probe: write, delayed background write, write
    Work(WorkArgs),
    /// Single-delay probe: sleep, then write one key
    Check(CheckArgs),
    /// Dispatch a raw function name with positional arguments
    Invoke(InvokeArgs),
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args)]
pub struct InitArgs {
    /// Accepted for compatibility and ignored
    #[arg(default_value = "0")]
    pub arg: String,
}

#[derive(Args)]
pub struct MakeAccountArgs {
    pub id: String,
    #[arg(allow_hyphen_values = true)]
    pub balance: String,
    pub name: String,
}

#[derive(Args)]
pub struct AmountArgs {
    pub id: String,
    #[arg(allow_hyphen_values = true)]
    pub amount: String,
}

#[derive(Args)]
pub struct ReadArgs {
    pub id: String,
}

#[derive(Args)]
pub struct WorkArgs {
    pub first: String,
    pub delayed: String,
    pub last: String,
    /// Override the configured probe delay
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

#[derive(Args)]
pub struct CheckArgs {
    pub key: String,
    /// Override the configured probe delay
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

#[derive(Args)]
pub struct InvokeArgs {
    pub function: String,
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
    /// Use the read-only entry point
    #[arg(long)]
    pub query: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["bank", "init"]).unwrap();
        if let Command::Init(args) = cli.command {
            assert_eq!(args.arg, "0");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_make_account_negative_balance() {
        let cli = Cli::try_parse_from(["bank", "make-account", "A1", "-5", "Alice"]).unwrap();
        if let Command::MakeAccount(args) = cli.command {
            assert_eq!(args.id, "A1");
            assert_eq!(args.balance, "-5");
            assert_eq!(args.name, "Alice");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_withdrawal() {
        let cli = Cli::try_parse_from(["bank", "withdrawal", "A1", "200"]).unwrap();
        if let Command::Withdrawal(args) = cli.command {
            assert_eq!(args.amount, "200");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_see_all() {
        let cli = Cli::try_parse_from(["bank", "see-all"]).unwrap();
        assert!(matches!(cli.command, Command::SeeAll));
    }

    #[test]
    fn parse_work_with_delay() {
        let cli =
            Cli::try_parse_from(["bank", "work", "a", "b", "c", "--delay-ms", "5"]).unwrap();
        if let Command::Work(args) = cli.command {
            assert_eq!(
                (args.first.as_str(), args.delayed.as_str(), args.last.as_str()),
                ("a", "b", "c")
            );
            assert_eq!(args.delay_ms, Some(5));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_check() {
        let cli = Cli::try_parse_from(["bank", "check", "k"]).unwrap();
        if let Command::Check(args) = cli.command {
            assert_eq!(args.key, "k");
            assert_eq!(args.delay_ms, None);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_invoke_raw() {
        let cli = Cli::try_parse_from(["bank", "invoke", "deposit", "A1", "-3"]).unwrap();
        if let Command::Invoke(args) = cli.command {
            assert_eq!(args.function, "deposit");
            assert_eq!(args.args, vec!["A1", "-3"]);
            assert!(!args.query);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_global_options() {
        let cli = Cli::try_parse_from([
            "bank",
            "--store",
            "/tmp/s.json",
            "--config",
            "bank.toml",
            "--format",
            "json",
            "see-all",
        ])
        .unwrap();
        assert_eq!(cli.store, PathBuf::from("/tmp/s.json"));
        assert_eq!(cli.config, Some(PathBuf::from("bank.toml")));
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn default_store_path() {
        let cli = Cli::try_parse_from(["bank", "-v", "config"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.store, PathBuf::from("bank-state.json"));
    }

    #[test]
    fn missing_args_rejected() {
        assert!(Cli::try_parse_from(["bank", "deposit", "A1"]).is_err());
        assert!(Cli::try_parse_from(["bank", "work", "a", "b"]).is_err());
    }
}
