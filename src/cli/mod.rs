use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::LedgerService;
use crate::domain::{TransactionId, TransactionStatus, UserId, format_cents, parse_cents};

/// Denaro - Balance Ledger
#[derive(Parser)]
#[command(name = "denaro")]
#[command(about = "A small ledger with user balances and two-tier transfer approvals")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "denaro.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// User management commands
    #[command(subcommand)]
    User(UserCommands),

    /// Create a transfer between users
    Transfer {
        /// Amount to transfer (e.g., "50.00" or "50")
        amount: String,

        /// Origin user id (debited)
        #[arg(long)]
        from: UserId,

        /// Destination user id (credited on approval)
        #[arg(long)]
        to: UserId,
    },

    /// List all transactions, newest first
    Transactions,

    /// Approve a pending transaction (credits the destination)
    Approve {
        /// Transaction id
        id: TransactionId,
    },

    /// Reject a pending transaction (refunds the origin)
    Reject {
        /// Transaction id
        id: TransactionId,
    },

    /// Export ledger data
    Export {
        /// What to export: transactions, users, full
        export_type: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a new user
    Create {
        /// User name
        name: String,

        /// Email address
        email: String,

        /// Starting balance (e.g., "1000.00", defaults to zero)
        #[arg(short, long, default_value = "0")]
        balance: String,
    },

    /// Show a user and their balance
    Show {
        /// User id
        id: UserId,
    },

    /// List all transactions involving a user (sent and received)
    Transactions {
        /// User id
        id: UserId,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        if self.verbose {
            eprintln!("Using database: {}", self.database);
        }

        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::User(user_cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_user_command(&service, user_cmd).await?;
            }

            Commands::Transfer { amount, from, to } => {
                let service = LedgerService::connect(&self.database).await?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;

                let result = service.create_transfer(from, to, amount_cents).await?;

                println!(
                    "Recorded transfer #{}: {} {} -> {} [{}]",
                    result.transaction.id,
                    format_cents(result.transaction.amount_cents),
                    result.origin_name,
                    result.destination_name,
                    result.transaction.status
                );
                if result.transaction.status == TransactionStatus::Pending {
                    println!(
                        "Held for approval: run 'denaro approve {}' or 'denaro reject {}'",
                        result.transaction.id, result.transaction.id
                    );
                }
            }

            Commands::Transactions => {
                let service = LedgerService::connect(&self.database).await?;
                let transactions = service.list_transactions().await?;
                print_transactions(&transactions);
            }

            Commands::Approve { id } => {
                let service = LedgerService::connect(&self.database).await?;
                let result = service.approve(id).await?;
                println!(
                    "Approved transaction #{}: credited {} to {}",
                    result.transaction.id,
                    format_cents(result.transaction.amount_cents),
                    result.credited.name
                );
            }

            Commands::Reject { id } => {
                let service = LedgerService::connect(&self.database).await?;
                let result = service.reject(id).await?;
                println!(
                    "Rejected transaction #{}: refunded {} to {}",
                    result.transaction.id,
                    format_cents(result.transaction.amount_cents),
                    result.credited.name
                );
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                run_export_command(&service, &export_type, output.as_deref()).await?;
            }
        }

        Ok(())
    }
}

async fn run_user_command(service: &LedgerService, cmd: UserCommands) -> Result<()> {
    match cmd {
        UserCommands::Create {
            name,
            email,
            balance,
        } => {
            let balance_cents = parse_cents(&balance)
                .context("Invalid balance format. Use '1000.00' or '1000'")?;

            let user = service.create_user(name, email, balance_cents).await?;
            println!(
                "Created user #{}: {} <{}> with balance {}",
                user.id,
                user.name,
                user.email,
                format_cents(user.balance_cents)
            );
        }

        UserCommands::Show { id } => {
            let user = service.get_user(id).await?;
            println!("User #{}", user.id);
            println!("  Name:    {}", user.name);
            println!("  Email:   {}", user.email);
            println!("  Balance: {}", format_cents(user.balance_cents));
        }

        UserCommands::Transactions { id } => {
            let transactions = service.user_transactions(id).await?;
            print_transactions(&transactions);
        }
    }
    Ok(())
}

fn print_transactions(transactions: &[crate::domain::Transaction]) {
    if transactions.is_empty() {
        println!("No transactions found.");
        return;
    }

    println!(
        "{:<6} {:<20} {:<8} {:<8} {:>12} {:<10}",
        "ID", "CREATED", "FROM", "TO", "AMOUNT", "STATUS"
    );
    println!("{}", "-".repeat(68));
    for transaction in transactions {
        println!(
            "{:<6} {:<20} {:<8} {:<8} {:>12} {:<10}",
            transaction.id,
            transaction.created_at.format("%Y-%m-%d %H:%M:%S"),
            transaction.origin_id,
            transaction.destination_id,
            format_cents(transaction.amount_cents),
            transaction.status
        );
    }
}

async fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "transactions" => {
            let count = exporter.export_transactions_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        "users" => {
            let count = exporter.export_users_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} users", count);
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported full database: {} users, {} transactions",
                    snapshot.users.len(),
                    snapshot.transactions.len()
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: transactions, users, full",
                export_type
            );
        }
    }

    Ok(())
}
