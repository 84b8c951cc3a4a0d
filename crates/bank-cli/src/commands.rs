use std::sync::Arc;

use anyhow::Context;
use bank_dispatch::{BankChaincode, BankConfig, Chaincode, Function};
use bank_ledger::Account;
use bank_store::FileStateStore;
use colored::Colorize;
use serde_json::json;
use tracing::debug;

use crate::cli::*;

/// One dispatch request assembled from the command line.
#[derive(Debug, PartialEq, Eq)]
pub struct Request {
    pub function: String,
    pub args: Vec<String>,
    pub query: bool,
}

impl Request {
    fn invoke(function: Function, args: Vec<String>) -> Self {
        Self {
            function: function.name().to_string(),
            args,
            query: false,
        }
    }

    fn query(function: Function, args: Vec<String>) -> Self {
        Self {
            function: function.name().to_string(),
            args,
            query: true,
        }
    }
}

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => BankConfig::load(path)?,
        None => BankConfig::default(),
    };

    let request = match cli.command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            return Ok(());
        }
        Command::Work(WorkArgs { delay_ms: Some(ms), .. })
        | Command::Check(CheckArgs { delay_ms: Some(ms), .. }) => {
            config.probe.delay_ms = ms;
            build_request(cli.command)
        }
        command => build_request(command),
    };

    let store = FileStateStore::open(&cli.store)
        .with_context(|| format!("opening state file {}", cli.store.display()))?;
    let bank = BankChaincode::new(Arc::new(store), &config);
    debug!(
        function = %request.function,
        args = request.args.len(),
        query = request.query,
        "dispatching"
    );

    let outcome = if request.query {
        bank.query(&request.function, &request.args).await
    } else {
        bank.invoke(&request.function, &request.args).await
    };

    match (outcome, cli.format) {
        (Ok(payload), OutputFormat::Text) => print_text(&request, &payload),
        (Ok(payload), OutputFormat::Json) => {
            let body = json!({
                "function": request.function,
                "ok": true,
                "payload": String::from_utf8_lossy(&payload),
            });
            println!("{body}");
        }
        (Err(e), OutputFormat::Text) => {
            anyhow::bail!("{} failed ({}): {e}", request.function, e.kind());
        }
        (Err(e), OutputFormat::Json) => {
            let body = json!({
                "function": request.function,
                "ok": false,
                "kind": e.kind().to_string(),
                "error": e.to_string(),
            });
            println!("{body}");
            anyhow::bail!("{} failed", request.function);
        }
    }
    Ok(())
}

pub fn build_request(command: Command) -> Request {
    match command {
        Command::Init(args) => Request::invoke(Function::Init, vec![args.arg]),
        Command::MakeAccount(args) => {
            Request::invoke(Function::MakeAccount, vec![args.id, args.balance, args.name])
        }
        Command::Deposit(args) => Request::invoke(Function::Deposit, vec![args.id, args.amount]),
        Command::Withdrawal(args) => {
            Request::invoke(Function::Withdrawal, vec![args.id, args.amount])
        }
        Command::Read(args) => Request::query(Function::Read, vec![args.id]),
        Command::SeeAll => Request::query(Function::SeeAll, vec![]),
        Command::Work(args) => {
            Request::invoke(Function::Work, vec![args.first, args.delayed, args.last])
        }
        Command::Check(args) => Request::invoke(Function::Check, vec![args.key]),
        Command::Invoke(args) => Request {
            function: args.function,
            args: args.args,
            query: args.query,
        },
        // Handled before a store is opened.
        Command::Config => Request::query(Function::SeeAll, vec![]),
    }
}

fn print_text(request: &Request, payload: &[u8]) {
    if payload.is_empty() {
        match Function::from_name(&request.function) {
            Some(Function::SeeAll) => println!("No accounts."),
            _ => println!("{} {}", "✓".green().bold(), request.function.bold()),
        }
        return;
    }

    if request.function == Function::Read.name() {
        if let Some(id) = request.args.first() {
            if let Ok(account) = Account::decode(id, payload) {
                println!(
                    "{}  {}  balance {}",
                    account.id.yellow().bold(),
                    account.name,
                    format_balance(account.balance)
                );
                return;
            }
        }
    }
    println!("{}", String::from_utf8_lossy(payload));
}

fn format_balance(balance: i64) -> String {
    if balance < 0 {
        balance.to_string().red().to_string()
    } else {
        balance.to_string().green().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn request(argv: &[&str]) -> Request {
        build_request(Cli::try_parse_from(argv).unwrap().command)
    }

    #[test]
    fn make_account_request() {
        let r = request(&["bank", "make-account", "A1", "100", "Alice"]);
        assert_eq!(
            r,
            Request::invoke(
                Function::MakeAccount,
                vec!["A1".into(), "100".into(), "Alice".into()]
            )
        );
    }

    #[test]
    fn reads_use_query_entry_point() {
        assert!(request(&["bank", "read", "A1"]).query);
        assert!(request(&["bank", "see-all"]).query);
        assert!(!request(&["bank", "deposit", "A1", "5"]).query);
    }

    #[test]
    fn init_passes_placeholder() {
        let r = request(&["bank", "init"]);
        assert_eq!(r.function, "init");
        assert_eq!(r.args, vec!["0"]);
    }

    #[test]
    fn invoke_passes_through() {
        let r = request(&["bank", "invoke", "seeAll"]);
        assert_eq!(r.function, "seeAll");
        assert!(r.args.is_empty());
    }

    #[tokio::test]
    async fn commands_persist_through_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");
        let state_arg = state.to_str().unwrap();

        for argv in [
            vec!["bank", "--store", state_arg, "init"],
            vec!["bank", "--store", state_arg, "make-account", "A1", "100", "Alice"],
            vec!["bank", "--store", state_arg, "deposit", "A1", "50"],
            vec!["bank", "--store", state_arg, "withdrawal", "A1", "200"],
        ] {
            run_command(Cli::try_parse_from(argv).unwrap()).await.unwrap();
        }

        let store = FileStateStore::open(&state).unwrap();
        let bank = BankChaincode::new(Arc::new(store), &BankConfig::default());
        let raw = bank.query("read", &["A1".to_string()]).await.unwrap();
        assert_eq!(Account::decode("A1", &raw).unwrap().balance, -50);
    }

    #[tokio::test]
    async fn failed_dispatch_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");
        let cli = Cli::try_parse_from([
            "bank",
            "--store",
            state.to_str().unwrap(),
            "deposit",
            "ghost",
            "1",
        ])
        .unwrap();
        let err = run_command(cli).await.unwrap_err();
        assert!(err.to_string().contains("MalformedAccount"), "{err}");
    }

    #[tokio::test]
    async fn check_honors_delay_override() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");
        let cli = Cli::try_parse_from([
            "bank",
            "--store",
            state.to_str().unwrap(),
            "check",
            "probe-key",
            "--delay-ms",
            "1",
        ])
        .unwrap();
        run_command(cli).await.unwrap();

        let store = FileStateStore::open(&state).unwrap();
        assert_eq!(
            bank_store::StateStore::get(&store, "probe-key").unwrap(),
            Some(b"love".to_vec())
        );
    }
}
