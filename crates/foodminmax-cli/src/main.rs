use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use foodminmax_api::CreditsClient;
use foodminmax_core::{
    Config, Constraints, EmailForm, FoodMetrics, FoodTracker, LoginNavigation,
    PersistenceGateway, RemoteStore, SessionBridge, SortField, TokenForm,
};

#[derive(Parser)]
#[command(name = "foodminmax")]
#[command(version, about = "Track foods against nutrition constraints", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List foods with their derived metrics
    List {
        /// Sort key: name, proteinPercent, caloriePercent, sodiumPercent,
        /// proteinVsCalorie, proteinVsSodium
        #[arg(long)]
        sort: Option<String>,
        /// Select the sort key a second time, flipping its direction
        #[arg(long)]
        flip: bool,
    },
    /// Add a food
    Add {
        name: String,
        calories: f64,
        sodium: f64,
        protein: f64,
    },
    /// Replace a food by its position in the unsorted list
    Edit {
        index: usize,
        name: String,
        calories: f64,
        sodium: f64,
        protein: f64,
    },
    /// Remove a food by its position in the unsorted list
    Remove { index: usize },
    /// Show or update the nutrition constraints
    Constraints {
        #[arg(long)]
        max_calories: Option<f64>,
        #[arg(long)]
        max_sodium: Option<f64>,
        #[arg(long)]
        min_protein: Option<f64>,
    },
    /// Export foods and constraints to a JSON file
    Export {
        /// Output path (defaults to foodminmax-export-<date>.json)
        path: Option<PathBuf>,
    },
    /// Import foods (and optionally constraints) from a JSON file
    Import {
        path: PathBuf,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Start the passwordless login with your email address
    Login { email: String },
    /// Finish the login with the one-time token from your inbox
    Verify { token: String },
    /// Show the credits page
    Credits,
    /// Show or update the client configuration
    Config {
        /// Base URL of the backend server
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - helps when things go sideways
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foodminmax=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;
    let base_url = config.server.base_url.clone();

    match cli.command {
        Commands::Config { base_url } => {
            if let Some(url) = base_url {
                config.server.base_url = url;
                config.save()?;
            }
            println!("base_url: {}", config.server.base_url);
        }
        Commands::Login { email } => {
            let session = SessionBridge::new(base_url);
            let mut form = EmailForm {
                email,
                error: String::new(),
            };
            match form.submit(&session).await {
                Some(LoginNavigation::TokenEntry) => {
                    println!("Check your inbox, then run: foodminmax verify <token>");
                }
                _ => println!("{}", form.error),
            }
        }
        Commands::Verify { token } => {
            let session = SessionBridge::new(base_url);
            let mut form = TokenForm {
                token,
                error: String::new(),
            };
            match form.submit(&session).await {
                Some(LoginNavigation::AppRoot) => println!("Logged in."),
                _ => println!("{}", form.error),
            }
        }
        Commands::Credits => {
            let credits = CreditsClient::new(base_url);
            println!("{}", credits.fetch().await);
        }
        command => {
            let mut tracker = build_tracker(&base_url).await;
            run_tracker_command(&mut tracker, command).await?;
        }
    }

    Ok(())
}

async fn build_tracker(base_url: &str) -> FoodTracker {
    let gateway = PersistenceGateway::new(Box::new(RemoteStore::new(base_url.to_string())));
    let mut tracker = FoodTracker::new(gateway);

    let session = SessionBridge::new(base_url.to_string());
    tracker.init(&session).await;

    if tracker.gateway().user().is_none() {
        tracing::warn!("No session user resolved; changes will not be saved");
    }

    tracker
}

async fn run_tracker_command(tracker: &mut FoodTracker, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::List { sort, flip } => {
            if let Some(field) = sort {
                let field: SortField = field
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!(e))?;
                tracker.sort_by(field);
                if flip {
                    tracker.sort_by(field);
                }
            }
            print_foods(tracker);
        }
        Commands::Add {
            name,
            calories,
            sodium,
            protein,
        } => {
            tracker.add_food(&name, calories, sodium, protein).await?;
            println!("Added {}.", name);
        }
        Commands::Edit {
            index,
            name,
            calories,
            sodium,
            protein,
        } => {
            tracker
                .edit_food(index, &name, calories, sodium, protein)
                .await?;
            println!("Updated food {}.", index);
        }
        Commands::Remove { index } => {
            tracker.remove_food(index).await?;
            println!("Removed food {}.", index);
        }
        Commands::Constraints {
            max_calories,
            max_sodium,
            min_protein,
        } => {
            if max_calories.is_some() || max_sodium.is_some() || min_protein.is_some() {
                let current = *tracker.constraints();
                tracker
                    .set_constraints(Constraints {
                        max_calories: max_calories.unwrap_or(current.max_calories),
                        max_sodium: max_sodium.unwrap_or(current.max_sodium),
                        min_protein: min_protein.unwrap_or(current.min_protein),
                    })
                    .await?;
            }
            let c = tracker.constraints();
            println!(
                "maxCalories: {}  maxSodium: {}  minProtein: {}",
                c.max_calories, c.max_sodium, c.min_protein
            );
        }
        Commands::Export { path } => {
            let written = tracker.export(path)?;
            println!("Exported to {}", written.display());
        }
        Commands::Import { path, yes } => {
            let staged = tracker.stage_import(&path)?;

            println!(
                "Import preview: {} foods, exported at {}{}",
                staged.foods_count(),
                staged
                    .exported_at()
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "unknown".to_string()),
                if staged.has_constraints() {
                    ", includes constraints"
                } else {
                    ""
                }
            );

            if !yes && !confirm(&staged.confirm_message())? {
                println!("Import cancelled.");
                return Ok(());
            }

            let message = tracker.confirm_import(staged).await?;
            println!("{}", message);
        }
        Commands::Login { .. }
        | Commands::Verify { .. }
        | Commands::Credits
        | Commands::Config { .. } => {
            unreachable!("handled before tracker construction")
        }
    }

    Ok(())
}

fn print_foods(tracker: &FoodTracker) {
    let constraints = tracker.constraints();
    let foods = tracker.sorted_foods();

    if foods.is_empty() {
        println!("No foods tracked yet. Try: foodminmax add <name> <calories> <sodium> <protein>");
        return;
    }

    println!(
        "{:<24} {:>9} {:>9} {:>9} {:>12} {:>12}",
        "Name", "Protein%", "Calorie%", "Sodium%", "P/Cal", "P/Sod"
    );

    for food in &foods {
        let m = FoodMetrics::compute(food, constraints);
        println!(
            "{:<24} {:>7} {} {:>7} {} {:>7} {} {:>10} {} {:>10} {}",
            truncate(&food.name, 24),
            m.protein_percent,
            band_mark(m.protein_band()),
            m.calorie_percent,
            band_mark(m.calorie_band()),
            m.sodium_percent,
            band_mark(m.sodium_band()),
            m.protein_vs_calorie,
            band_mark(m.protein_vs_calorie_band()),
            m.protein_vs_sodium,
            band_mark(m.protein_vs_sodium_band()),
        );
    }

    if let Some(marker) = tracker.gateway().last_saved() {
        println!("\nLast saved: {}", marker);
    }
}

fn band_mark(band: foodminmax_core::Band) -> char {
    match band {
        foodminmax_core::Band::Good => '+',
        foodminmax_core::Band::Warning => '~',
        foodminmax_core::Band::Poor => '-',
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max - 1).collect();
        format!("{}…", cut)
    }
}

fn confirm(message: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", message);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
