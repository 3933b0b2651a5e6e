use anyhow::Result;
use clap::{Parser, Subcommand};

use budget_ledger::cli::{
    handle_budget_command, handle_overview_command, handle_slice_command,
    handle_transaction_command, BudgetCommands, CommandContext, OverviewCommands, SliceCommands,
    TransactionCommands,
};
use budget_ledger::config::{LedgerPaths, Settings};
use budget_ledger::overview::AsOf;
use budget_ledger::storage::JsonStore;

#[derive(Parser)]
#[command(
    name = "budget",
    version,
    about = "Yearly budgeting from the command line",
    long_about = "Plan a year of income and expenses as budgets, book transactions \
                  against them, and see how every month stands against the plan."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Slice management commands
    #[command(subcommand)]
    Slice(SliceCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Monthly and yearly overviews
    #[command(subcommand)]
    Overview(OverviewCommands),

    /// Set the balance carried into a year
    Opening {
        year: i32,
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = LedgerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    budget_ledger::init_tracing(&settings.log_level);

    let store = JsonStore::open(&paths)?;
    let as_of = AsOf::today();

    match cli.command {
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&CommandContext::new(&store, &settings, as_of), cmd)?;
        }
        Some(Commands::Slice(cmd)) => {
            handle_slice_command(&CommandContext::new(&store, &settings, as_of), cmd)?;
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&CommandContext::new(&store, &settings, as_of), cmd)?;
        }
        Some(Commands::Overview(cmd)) => {
            handle_overview_command(&CommandContext::new(&store, &settings, as_of), cmd)?;
        }
        Some(Commands::Opening { year, amount }) => {
            let amount = settings.parse_money(&amount)?;
            settings.set_opening_balance(year, amount);
            settings.save(&paths)?;
            println!("Opening balance for {}: {}", year, settings.format_money(amount));
        }
        Some(Commands::Config) => {
            println!("Budget Ledger Configuration");
            println!("===========================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Settings file:     {}", paths.settings_file().display());
            println!("Budgets file:      {}", store.budgets_path().display());
            println!("Transactions file: {}", store.transactions_path().display());
            println!();
            println!("Settings:");
            println!("  Overview name:     {}", settings.overview_name);
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!("  Decimal separator: {}", settings.decimal_separator);
            println!("  Log level:         {}", settings.log_level);
            for (year, amount) in &settings.opening_balances {
                println!("  Opening {}:      {}", year, settings.format_money(*amount));
            }
        }
        None => {
            println!("Budget Ledger - yearly budgeting from the command line");
            println!();
            println!("Run 'budget --help' for usage information.");
        }
    }

    Ok(())
}
