//! Command-line entry point for the shorty administration client
//!
//! Wires the configuration, token store, transport, resource clients and
//! view-state modules into a set of subcommands mirroring the admin UI:
//! listing/searching/sorting/paging mappings, creating, editing and
//! deleting them, rendering QR codes, managing admin users, and handling
//! the stored session token.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use dotenvy::dotenv;

use shorty_admin::actions::{AdminActions, PathActions};
use shorty_admin::cache::ReadCache;
use shorty_admin::client::{AdminClient, UrlClient};
use shorty_admin::config::Config;
use shorty_admin::error::ApiError;
use shorty_admin::form::{validate_admin_form, validate_mapping_form, SubmitGuard};
use shorty_admin::list::{ListView, SortColumn, SortOrder};
use shorty_admin::model::{Message, MessageKind};
use shorty_admin::probe::probe_once;
use shorty_admin::qr::{qr_unicode, short_link};
use shorty_admin::token::TokenStore;
use shorty_admin::transport::Transport;

/// Administration client for the shorty URL shortener
#[derive(Parser)]
#[command(name = "shorty-admin", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List saved paths with search, sort and paging
    List {
        /// Case-insensitive substring filter on the path
        #[arg(long, default_value = "")]
        search: String,

        /// Column to sort by
        #[arg(long, value_enum, default_value = "path")]
        sort: SortArg,

        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,

        /// Page to show, starting at 0
        #[arg(long, default_value_t = 0)]
        page: usize,

        /// Rows per page (5, 15 or 25)
        #[arg(long, default_value_t = 5)]
        rows: usize,
    },

    /// Create a new short path
    Add { path: String, url: String },

    /// Change the target URL of an existing path
    Update { path: String, url: String },

    /// Delete a path
    Delete {
        path: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show the QR code for a path
    Qr { path: String },

    /// Manage admin users
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },

    /// Store an access token obtained from the identity provider
    Login {
        /// Token value; prompted for when omitted
        #[arg(long)]
        token: Option<String>,
    },

    /// Clear the stored access token
    Logout,

    /// Show session and admin-capability status
    Status,
}

#[derive(Subcommand)]
enum AdminCommand {
    /// List admin users
    List,

    /// Grant admin rights to an email address
    Add { email: String },

    /// Revoke admin rights
    Remove {
        email: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Path,
    Url,
}

impl From<SortArg> for SortColumn {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Path => SortColumn::Path,
            SortArg::Url => SortColumn::Url,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file if it exists
    dotenv().ok();

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "shorty_admin=warn".to_string());
    tracing_subscriber::fmt().with_env_filter(filter.as_str()).init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let tokens = TokenStore::new(&config.token_file);
    let transport = Transport::new(tokens.clone());
    let cache = Arc::new(ReadCache::new());

    let result = match cli.command {
        Command::List {
            search,
            sort,
            desc,
            page,
            rows,
        } => {
            let actions = PathActions::new(UrlClient::new(transport, &config), cache);
            list_command(&actions, &search, sort.into(), desc, page, rows).await
        }
        Command::Add { path, url } => {
            let actions = PathActions::new(UrlClient::new(transport, &config), cache);
            add_command(&actions, &path, &url).await
        }
        Command::Update { path, url } => {
            let actions = PathActions::new(UrlClient::new(transport, &config), cache);
            update_command(&actions, &path, &url).await
        }
        Command::Delete { path, yes } => {
            let actions = PathActions::new(UrlClient::new(transport, &config), cache);
            delete_command(&actions, &path, yes).await
        }
        Command::Qr { path } => {
            let actions = PathActions::new(UrlClient::new(transport, &config), cache);
            qr_command(&actions, &config, &path).await
        }
        Command::Admin { command } => {
            let actions = AdminActions::new(AdminClient::new(transport, &config), cache);
            match command {
                AdminCommand::List => admin_list_command(&actions).await,
                AdminCommand::Add { email } => admin_add_command(&actions, &email).await,
                AdminCommand::Remove { email, yes } => {
                    admin_remove_command(&actions, &email, yes).await
                }
            }
        }
        Command::Login { token } => login_command(&config, &tokens, token),
        Command::Logout => logout_command(&tokens),
        Command::Status => status_command(&config, &tokens).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&err);
            ExitCode::FAILURE
        }
    }
}

/// Prints the persistent full-page failure states; transient messages are
/// printed where they are set
fn report_failure(err: &ApiError) {
    match err {
        ApiError::NoToken => {
            eprintln!("No access token found. Run `shorty-admin login` first.")
        }
        _ if err.is_unauthorized() => eprintln!("You are unauthorized. Please log in."),
        _ => eprintln!("Something unexpected happened. Try again later. ({err})"),
    }
}

fn print_message(message: Option<Message>) {
    if let Some(message) = message {
        match message.kind {
            MessageKind::Success => println!("✔ {}", message.text),
            MessageKind::Error => eprintln!("✖ {}", message.text),
        }
    }
}

fn print_field_errors(errors: &[shorty_admin::form::FieldError]) {
    for error in errors {
        eprintln!("✖ {}: {}", error.field, error.message);
    }
}

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    let _ = io::stdout().flush();
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

async fn list_command(
    actions: &PathActions,
    search: &str,
    sort: SortColumn,
    desc: bool,
    page: usize,
    rows: usize,
) -> Result<(), ApiError> {
    let mappings = actions.mappings().await?;
    if mappings.is_empty() {
        println!("No URLS available, write the first one.");
        return Ok(());
    }

    let mut view = ListView::new();
    view.set_search(search);
    view.set_sort(
        sort,
        if desc {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        },
    );
    view.set_rows_per_page(rows);
    view.set_page(page);

    let visible = view.visible(&mappings);
    for row in &visible {
        let marker = if row.modify { ' ' } else { '*' };
        println!("{}{}  ->  {}  (owner: {})", marker, row.path, row.url, row.owner);
    }

    let filtered = view.filtered_count(&mappings);
    println!();
    println!("Total number of paths: {}", mappings.len());
    println!(
        "Page {} of {} ({} matching)",
        view.page() + 1,
        view.total_pages(filtered),
        filtered
    );
    println!("Rows marked * belong to another owner and cannot be modified.");
    Ok(())
}

async fn add_command(actions: &PathActions, path: &str, url: &str) -> Result<(), ApiError> {
    let payload = match validate_mapping_form(path, url) {
        Ok(payload) => payload,
        Err(errors) => {
            print_field_errors(&errors);
            return Ok(());
        }
    };

    let mut guard = SubmitGuard::new();
    if !guard.begin() {
        return Ok(());
    }
    let result = actions.submit(&payload, Instant::now()).await;
    guard.finish();

    print_message(actions.form_message(Instant::now()));
    result
}

async fn update_command(actions: &PathActions, path: &str, url: &str) -> Result<(), ApiError> {
    let payload = match validate_mapping_form(path, url) {
        Ok(payload) => payload,
        Err(errors) => {
            print_field_errors(&errors);
            return Ok(());
        }
    };

    let mappings = actions.mappings().await?;
    let mut view = ListView::new();
    if !view.begin_edit(&mappings, &payload.path) {
        eprintln!(
            "✖ Path \"{}\" does not exist or you may not modify it.",
            payload.path
        );
        return Ok(());
    }

    let result = actions.update(&payload, Instant::now()).await;
    view.finish_edit();

    print_message(actions.row_message(&payload.path, Instant::now()));
    result
}

async fn delete_command(actions: &PathActions, path: &str, yes: bool) -> Result<(), ApiError> {
    if !yes && !confirm(&format!("Are you sure you want to delete path {}?", path)) {
        println!("Aborted.");
        return Ok(());
    }

    let result = actions.delete(path, Instant::now()).await;
    print_message(actions.list_message(Instant::now()));
    result
}

async fn qr_command(actions: &PathActions, config: &Config, path: &str) -> Result<(), ApiError> {
    let mappings = actions.mappings().await?;
    let mut view = ListView::new();
    if !view.show_qr(&mappings, path) {
        eprintln!("✖ Path \"{}\" not found.", path);
        return Ok(());
    }

    let link = short_link(&config.api_url, path);
    println!("{}", link);
    if let Some(mapping) = mappings.iter().find(|m| m.path == path) {
        println!("-> {}", mapping.url);
    }
    match qr_unicode(&link) {
        Ok(grid) => println!("{}", grid),
        Err(err) => eprintln!("✖ Could not render QR code: {err}"),
    }
    view.close_qr();
    Ok(())
}

async fn admin_list_command(actions: &AdminActions) -> Result<(), ApiError> {
    let admins = actions.admins().await?;
    if admins.is_empty() {
        println!("No admin users found.");
        return Ok(());
    }
    for email in &admins {
        println!("{}", email);
    }
    println!();
    println!("Total admin users: {}", admins.len());
    Ok(())
}

async fn admin_add_command(actions: &AdminActions, email: &str) -> Result<(), ApiError> {
    let email = match validate_admin_form(email) {
        Ok(email) => email,
        Err(errors) => {
            print_field_errors(&errors);
            return Ok(());
        }
    };

    let mut guard = SubmitGuard::new();
    if !guard.begin() {
        return Ok(());
    }
    let result = actions.add(&email, Instant::now()).await;
    guard.finish();

    print_message(actions.form_message(Instant::now()));
    result
}

async fn admin_remove_command(
    actions: &AdminActions,
    email: &str,
    yes: bool,
) -> Result<(), ApiError> {
    if !yes
        && !confirm(&format!(
            "Are you sure you want to delete admin user: \"{}\"?",
            email
        ))
    {
        println!("Aborted.");
        return Ok(());
    }

    let result = actions.remove(email, Instant::now()).await;
    print_message(actions.row_message(email, Instant::now()));
    result
}

fn login_command(
    config: &Config,
    tokens: &TokenStore,
    token: Option<String>,
) -> Result<(), ApiError> {
    let token = match token {
        Some(token) => token,
        None => {
            println!(
                "Obtain an access token via {} (client id: {}, redirect: {}).",
                config.authorization_endpoint(),
                config.client_id,
                config.redirect_uri
            );
            print!("Paste access token: ");
            let _ = io::stdout().flush();
            let mut line = String::new();
            if io::stdin().lock().read_line(&mut line).is_err() {
                eprintln!("✖ Could not read token from stdin.");
                return Ok(());
            }
            line.trim().to_string()
        }
    };

    if token.is_empty() {
        eprintln!("✖ Empty token, nothing stored.");
        return Ok(());
    }

    if let Err(err) = tokens.save(&token) {
        eprintln!("✖ Could not store token: {err}");
        return Ok(());
    }
    println!("✔ Access token stored.");
    Ok(())
}

fn logout_command(tokens: &TokenStore) -> Result<(), ApiError> {
    if let Err(err) = tokens.clear() {
        eprintln!("✖ Could not clear token: {err}");
        return Ok(());
    }
    println!("✔ Access token cleared.");
    Ok(())
}

async fn status_command(config: &Config, tokens: &TokenStore) -> Result<(), ApiError> {
    println!("API:           {}", config.api_url);
    println!("Auth endpoint: {}", config.authorization_endpoint());
    println!("Token endpoint: {}", config.token_endpoint());

    match tokens.load() {
        None => println!("Session:       no access token stored"),
        Some(_) => {
            println!("Session:       access token present");
            let is_admin = probe_once(config, tokens).await;
            println!("Admin:         {}", if is_admin { "yes" } else { "no" });
        }
    }
    Ok(())
}
