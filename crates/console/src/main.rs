mod commands;
mod demo;
mod prompt;
mod render;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use salesops::config::Config;
use salesops::SalesOps;

use crate::commands::Console;
use crate::prompt::PromptConfirm;

#[derive(Parser, Debug)]
#[clap(name = "salesops", version)]
#[clap(about = "Operator console for the sales order automation backend", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// Backend base URL. Defaults to SALESOPS_API_URL, then http://localhost:8000.
    #[clap(long, env = "SALESOPS_API_URL")]
    api_url: Option<String>,

    /// Output debug logs to stderr
    #[clap(long, global = true)]
    debug: bool,

    /// Answer yes to every confirmation prompt
    #[clap(long, short = 'y', global = true)]
    yes: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that the backend is reachable
    Health,
    /// Order and email statistics
    Dashboard {
        /// Keep refreshing until interrupted
        #[clap(long)]
        watch: bool,
    },
    /// Ask the backend to pull new mail from its mailbox
    FetchEmails,
    /// Advance the workflow of every open order
    ProcessWorkflow,
    /// New inquiries waiting to be picked up
    Orders,
    /// One order with its line items, tasks and applied rules
    Order { id: i64 },
    /// Completed orders
    Completed,
    /// Download the sales order PDF
    Pdf {
        id: i64,
        /// Output file, defaults to Sales_Order_<id>.pdf
        #[clap(long)]
        out: Option<PathBuf>,
    },
    /// Page through the raw email log
    Emails {
        #[clap(long)]
        limit: Option<u32>,
        #[clap(long, default_value_t = 0)]
        offset: u32,
    },
    /// Conversation per open order
    Conversations {
        /// Workflow stage to show, or "all"
        #[clap(long, default_value = "all")]
        stage: String,
        /// incoming, outgoing or "all"
        #[clap(long, default_value = "all")]
        direction: String,
        /// Print the full thread under each conversation
        #[clap(long)]
        expand: bool,
    },
    /// An order's email thread, oldest first
    Thread { id: i64 },
    /// Actions available for an order
    Actions { id: i64 },
    /// Run one action on an order (see `actions <id>`)
    Act { id: i64, action: String },
    /// Reply to the order's customer, threaded onto their latest email
    Reply {
        id: i64,
        #[clap(long)]
        body: String,
        /// Overrides the proposed "Re: ..." subject
        #[clap(long)]
        subject: Option<String>,
    },
    /// Have the backend draft a reply
    Draft {
        id: i64,
        /// Send the drafted reply right away
        #[clap(long)]
        send: bool,
    },
    /// Submit raw email text ("-" reads stdin)
    Submit {
        content: String,
        /// Append to this order instead of creating a new one
        #[clap(long)]
        order: Option<i64>,
        #[clap(long)]
        customer_email: Option<String>,
    },
    /// Simulate a new customer inquiry
    NewOrder {
        #[clap(long)]
        email: String,
        /// Inquiry text ("-" reads stdin)
        content: String,
    },
    /// List the sample inquiries, or submit one by id
    Demo { template: Option<String> },
    /// Business rules
    Rules {
        #[clap(subcommand)]
        command: RuleCommands,
    },
    /// Attach a workflow task to an order
    Task {
        id: i64,
        task_type: String,
        /// JSON object passed to the task
        #[clap(long)]
        parameters: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum RuleCommands {
    List,
    Show { id: i64 },
    Create(RuleArgs),
    Update {
        id: i64,
        #[clap(flatten)]
        args: RuleArgs,
    },
    /// Flip a rule between active and inactive
    Toggle { id: i64 },
    Delete { id: i64 },
    /// Dry-run conditions against sample metrics
    Test {
        #[clap(long)]
        conditions: String,
        #[clap(long)]
        metrics: String,
    },
    Stats,
}

/// Rule form fields. Blobs are JSON text; anything that does not parse is
/// sent as a plain string.
#[derive(Args, Debug, Default)]
pub struct RuleArgs {
    #[clap(long)]
    pub name: Option<String>,
    #[clap(long)]
    pub description: Option<String>,
    #[clap(long)]
    pub conditions: Option<String>,
    #[clap(long)]
    pub actions: Option<String>,
    /// 1 to 10
    #[clap(long)]
    pub priority: Option<String>,
    /// quantity, amount, product or customer
    #[clap(long = "type")]
    pub rule_type: Option<String>,
    #[clap(long)]
    pub active: Option<bool>,
}

fn init_logging(debug: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    } else {
        let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn config(api_url: Option<&str>) -> anyhow::Result<Config> {
    let config = Config::from_env().context("invalid client configuration")?;
    match api_url {
        Some(url) => Ok(Config::new(url)
            .with_context(|| format!("invalid API URL '{}'", url))?
            .with_options(config.options)),
        None => Ok(config),
    }
}

async fn run() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.debug);

    let api = SalesOps::from_config(config(cli.api_url.as_deref())?)?;
    let console = Console::new(api, PromptConfirm::new(cli.yes));

    match cli.command {
        Commands::Health => console.health().await,
        Commands::Dashboard { watch } => console.dashboard(watch).await,
        Commands::FetchEmails => console.fetch_emails().await,
        Commands::ProcessWorkflow => console.process_workflow().await,
        Commands::Orders => console.orders().await,
        Commands::Order { id } => console.order(id).await,
        Commands::Completed => console.completed().await,
        Commands::Pdf { id, out } => console.pdf(id, out).await,
        Commands::Emails { limit, offset } => console.emails(limit, offset).await,
        Commands::Conversations {
            stage,
            direction,
            expand,
        } => console.conversations(&stage, &direction, expand).await,
        Commands::Thread { id } => console.thread(id).await,
        Commands::Actions { id } => console.actions(id).await,
        Commands::Act { id, action } => console.act(id, &action).await,
        Commands::Reply { id, body, subject } => console.reply(id, &body, subject).await,
        Commands::Draft { id, send } => console.draft(id, send).await,
        Commands::Submit {
            content,
            order,
            customer_email,
        } => console.submit(&content, order, customer_email).await,
        Commands::NewOrder { email, content } => console.new_order(&email, &content).await,
        Commands::Demo { template } => console.demo(template.as_deref()).await,
        Commands::Rules { command } => match command {
            RuleCommands::List => console.rules_list().await,
            RuleCommands::Show { id } => console.rules_show(id).await,
            RuleCommands::Create(args) => console.rules_create(args).await,
            RuleCommands::Update { id, args } => console.rules_update(id, args).await,
            RuleCommands::Toggle { id } => console.rules_toggle(id).await,
            RuleCommands::Delete { id } => console.rules_delete(id).await,
            RuleCommands::Test {
                conditions,
                metrics,
            } => console.rules_test(&conditions, &metrics).await,
            RuleCommands::Stats => console.rules_stats().await,
        },
        Commands::Task {
            id,
            task_type,
            parameters,
        } => console.task(id, &task_type, parameters.as_deref()).await,
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
