//! Mercado Barrio CLI - drive the client engine from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the directory
//! mb-cli negocios list
//! mb-cli negocios show 7
//! mb-cli categorias
//!
//! # Account
//! mb-cli login -t cliente -n +573001112233 -p secret
//! mb-cli register -t negocio --nombre "Panadería Don Manolo" -n +57300 -p secret
//! mb-cli logout
//!
//! # Orders
//! mb-cli pedido create --negocio 7 --cantidad 2 -m "Dos panes integrales"
//! mb-cli pedidos
//! ```
//!
//! The CLI is a thin shell: every flow goes through the same engine the
//! graphical shells use, including the session file and the role-guarded
//! router.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mb-cli")]
#[command(author, version, about = "Mercado Barrio command-line client")]
struct Cli {
    /// Override the API base URL (else MERCADO_API_URL, else localhost).
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse businesses
    Negocios {
        #[command(subcommand)]
        action: NegociosAction,
    },
    /// List the category catalog
    Categorias,
    /// Log in and persist the session
    Login {
        /// Account type (`cliente` or `negocio`)
        #[arg(short, long, default_value = "cliente")]
        tipo: String,

        /// Phone number the account is registered under
        #[arg(short = 'n', long)]
        telefono: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Clear the persisted session
    Logout,
    /// Register a new account
    Register {
        /// Account type (`cliente` or `negocio`)
        #[arg(short, long, default_value = "cliente")]
        tipo: String,

        /// Display name (or business name for negocio accounts)
        #[arg(long)]
        nombre: String,

        /// Phone number to register
        #[arg(short = 'n', long)]
        telefono: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Place an order
    Pedido {
        #[command(subcommand)]
        action: PedidoAction,
    },
    /// List your orders (customer or business, per the session role)
    Pedidos,
}

#[derive(Subcommand)]
enum NegociosAction {
    /// List the business directory
    List {
        /// Filter by name, category, city or neighborhood
        #[arg(long)]
        buscar: Option<String>,
    },
    /// Show one business with its products
    Show {
        /// Business id
        id: i32,
    },
}

#[derive(Subcommand)]
enum PedidoAction {
    /// Create an order and print the WhatsApp hand-off link
    Create {
        /// Target business id
        #[arg(long)]
        negocio: i32,

        /// Optional product id
        #[arg(long)]
        producto: Option<i32>,

        /// Quantity
        #[arg(long, default_value_t = 1)]
        cantidad: u32,

        /// Free-text order message
        #[arg(short, long, default_value = "")]
        mensaje: String,

        /// Your name (defaults to the session name)
        #[arg(long)]
        nombre: Option<String>,

        /// Contact phone for anonymous orders
        #[arg(long)]
        telefono: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = commands::build_app(cli.api_url.as_deref())?;

    match cli.command {
        Commands::Negocios { action } => match action {
            NegociosAction::List { buscar } => {
                commands::browse::list_negocios(&app, buscar.as_deref()).await?;
            }
            NegociosAction::Show { id } => commands::browse::show_negocio(&app, id).await?,
        },
        Commands::Categorias => commands::browse::list_categorias(&app).await?,
        Commands::Login {
            tipo,
            telefono,
            password,
        } => commands::auth::login(&mut app, &tipo, telefono, password).await?,
        Commands::Logout => commands::auth::logout(&mut app).await,
        Commands::Register {
            tipo,
            nombre,
            telefono,
            password,
        } => commands::auth::register(&app, &tipo, nombre, telefono, password).await?,
        Commands::Pedido { action } => match action {
            PedidoAction::Create {
                negocio,
                producto,
                cantidad,
                mensaje,
                nombre,
                telefono,
            } => {
                commands::pedidos::create(
                    &mut app,
                    commands::pedidos::CreateArgs {
                        negocio,
                        producto,
                        cantidad,
                        mensaje,
                        nombre,
                        telefono,
                    },
                )
                .await?;
            }
        },
        Commands::Pedidos => commands::pedidos::list(&app).await?,
    }
    Ok(())
}
