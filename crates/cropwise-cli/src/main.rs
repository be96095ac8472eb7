//! Cropwise CLI
//!
//! Rule-based crop advice plus a small Q&A forum, backed by a local SQLite file.

mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cropwise_core::{AdviceForm, MissingFieldPolicy};
use cropwise_runtime::{
    AdviceLog, AdviceService, CropwiseConfig, ForumService, IdentityProvider, NewPost, Password,
    PostFilter, ReferenceRecord, SessionToken, SqliteStore, UserProfile,
};

#[derive(Parser)]
#[command(name = "cropwise")]
#[command(author, version, about = "Crop advice and farmer Q&A", long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "CROPWISE_CONFIG")]
    config: Option<PathBuf>,

    /// Database file (overrides the config file)
    #[arg(long, global = true, env = "CROPWISE_DB")]
    db: Option<PathBuf>,

    /// Session token from `cropwise login`
    #[arg(long, global = true, env = "CROPWISE_SESSION", hide_env_values = true)]
    session: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get rule-based advice for field conditions
    Advise {
        /// Crop name
        #[arg(long)]
        crop: Option<String>,

        /// Temperature in °C
        #[arg(long, allow_hyphen_values = true)]
        temp: Option<String>,

        /// Relative humidity in %
        #[arg(long, allow_hyphen_values = true)]
        hum: Option<String>,

        /// Soil pH
        #[arg(long, allow_hyphen_values = true)]
        ph: Option<String>,

        /// Market price
        #[arg(long, allow_hyphen_values = true)]
        price: Option<String>,

        /// Reject missing numeric fields instead of defaulting them
        #[arg(long)]
        strict: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Create an account
    Register {
        #[arg(long)]
        username: String,

        #[arg(long, env = "CROPWISE_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long, default_value = "")]
        region: String,
    },

    /// Log in and print a session token
    Login {
        #[arg(long)]
        username: String,

        #[arg(long, env = "CROPWISE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// End the current session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Latest questions
    Home,

    /// Ask, browse, edit and delete questions
    Post {
        #[command(subcommand)]
        action: PostCommands,
    },

    /// Answer a question
    Answer {
        /// Question id
        post_id: i64,

        #[arg(long)]
        content: String,
    },

    /// Show your points and their history
    Points,

    /// Reference data entry (weather, crop care, prices, schemes)
    Admin {
        #[command(subcommand)]
        action: AdminCommands,
    },

    /// JSON read endpoints
    Api {
        #[command(subcommand)]
        action: ApiCommands,
    },

    /// Recent advice requests as JSON
    AdviceLog {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum PostCommands {
    /// Ask a question
    Add {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        crop: String,

        #[arg(long)]
        content: String,
    },

    /// List questions, optionally filtered
    List {
        /// Keyword in title or content
        #[arg(long)]
        q: Option<String>,

        /// Crop tag
        #[arg(long)]
        crop: Option<String>,
    },

    /// Show a question with its answers
    Show { id: i64 },

    /// Replace a question's title, crop and content
    Edit {
        id: i64,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        crop: String,

        #[arg(long)]
        content: String,
    },

    /// Delete a question and its answers
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Add a reference record
    Add {
        #[command(subcommand)]
        record: AdminRecord,
    },

    /// Show the latest reference records
    List,
}

#[derive(Subcommand)]
enum AdminRecord {
    Weather {
        #[arg(long)]
        location: String,
        #[arg(long)]
        forecast: String,
    },
    CropCare {
        #[arg(long)]
        crop: String,
        #[arg(long)]
        technique: String,
    },
    Price {
        #[arg(long)]
        crop: String,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        price: f64,
    },
    Scheme {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        details: String,
    },
}

#[derive(Subcommand)]
enum ApiCommands {
    /// All posts, newest first
    Posts,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl From<AdminRecord> for ReferenceRecord {
    fn from(record: AdminRecord) -> Self {
        match record {
            AdminRecord::Weather { location, forecast } => ReferenceRecord::Weather { location, forecast },
            AdminRecord::CropCare { crop, technique } => ReferenceRecord::CropCare {
                crop_name: crop,
                technique,
            },
            AdminRecord::Price { crop, price } => ReferenceRecord::Price { crop_name: crop, price },
            AdminRecord::Scheme { name, details } => ReferenceRecord::Scheme {
                scheme_name: name,
                details,
            },
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<CropwiseConfig> {
    let mut config = match &cli.config {
        Some(path) => CropwiseConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => CropwiseConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }
    Ok(config)
}

/// Everything a command needs, resolved once.
struct App {
    config: CropwiseConfig,
    store: Arc<SqliteStore>,
    session: Option<SessionToken>,
    user: Option<UserProfile>,
}

impl App {
    fn open(cli: &Cli) -> Result<Self> {
        let config = load_config(cli)?;
        let ttl = config.session_ttl()?;
        let store = SqliteStore::open(&config.database_path)
            .with_context(|| format!("Failed to open database {:?}", config.database_path))?
            .with_session_ttl(ttl);

        let session = cli.session.as_deref().map(SessionToken::new);
        let user = match &session {
            Some(token) => store.resolve(token)?,
            None => None,
        };
        debug!(user = ?user.as_ref().map(|u| &u.username), "session resolved");

        Ok(Self {
            config,
            store: Arc::new(store),
            session,
            user,
        })
    }

    fn forum(&self) -> ForumService {
        ForumService::new(self.store.clone())
            .with_points(self.config.points.clone())
            .with_listing(self.config.listing.clone())
    }

    fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let app = App::open(&cli)?;

    match cli.command {
        Commands::Advise {
            crop,
            temp,
            hum,
            ph,
            price,
            strict,
            format,
        } => {
            let policy = if strict {
                MissingFieldPolicy::Strict
            } else {
                app.config.missing_fields
            };
            let form = AdviceForm {
                crop,
                temp,
                hum,
                ph,
                price,
            };

            let service = AdviceService::new(app.store.clone(), policy);
            let outcome = match service.advise(app.user(), &form) {
                Ok(outcome) => outcome,
                Err(e) => anyhow::bail!("{} ({})", e.user_message(), e.field()),
            };
            if let Some(err) = &outcome.log_error {
                eprintln!("Warning: advice was not logged: {}", err);
            }

            match format {
                OutputFormat::Text => output::print_advice(&outcome.result),
                OutputFormat::Json => output::print_json(&outcome)?,
            }
        }

        Commands::Register {
            username,
            password,
            region,
        } => {
            let id = app.store.register(&username, &Password::new(password), &region)?;
            println!("Registered '{}' (user #{}). Please log in.", username.trim(), id);
        }

        Commands::Login { username, password } => {
            let token = app.store.login(&username, &Password::new(password))?;
            println!("{}", token);
            eprintln!("Logged in. Export CROPWISE_SESSION={} to stay logged in.", token);
        }

        Commands::Logout => match &app.session {
            Some(token) => {
                app.store.logout(token)?;
                println!("Logged out");
            }
            None => println!("Not logged in"),
        },

        Commands::Whoami => match app.user() {
            Some(user) => output::print_user(user),
            None => println!("anonymous"),
        },

        Commands::Home => {
            let posts = app.forum().home()?;
            output::print_posts(&posts);
        }

        Commands::Post { action } => {
            let forum = app.forum();
            match action {
                PostCommands::Add { title, crop, content } => {
                    let id = forum.ask(app.user(), &NewPost::new(title, crop, content))?;
                    println!("Post #{} added", id);
                }
                PostCommands::List { q, crop } => {
                    let mut filter = PostFilter::default();
                    if let Some(q) = q {
                        filter = filter.keyword(q);
                    }
                    if let Some(crop) = crop {
                        filter = filter.crop(crop);
                    }
                    output::print_posts(&forum.browse(&filter)?);
                }
                PostCommands::Show { id } => {
                    output::print_detail(&forum.detail(id)?);
                }
                PostCommands::Edit {
                    id,
                    title,
                    crop,
                    content,
                } => {
                    forum.edit(app.user(), id, &NewPost::new(title, crop, content))?;
                    println!("Post #{} updated", id);
                }
                PostCommands::Delete { id } => {
                    forum.delete(app.user(), id)?;
                    println!("Post #{} deleted", id);
                }
            }
        }

        Commands::Answer { post_id, content } => {
            app.forum().answer(app.user(), post_id, &content)?;
            println!("Answer posted to #{}", post_id);
        }

        Commands::Points => {
            let summary = app.forum().points(app.user())?;
            output::print_points(&summary);
        }

        Commands::Admin { action } => match action {
            AdminCommands::Add { record } => {
                let record = ReferenceRecord::from(record);
                let kind = record.kind();
                app.forum().add_reference(&record)?;
                println!("Saved {} entry", kind);
            }
            AdminCommands::List => {
                output::print_board(&app.forum().reference_board()?);
            }
        },

        Commands::Api { action } => match action {
            ApiCommands::Posts => output::print_json(&app.forum().api_posts()?)?,
        },

        Commands::AdviceLog { limit } => {
            output::print_json(&app.store.recent_entries(limit)?)?;
        }
    }

    Ok(())
}
