use clap::{Parser, Subcommand};
use landing_builder::form::{Capability, FormSubmission, changed_fields};
use landing_builder::page::{self, PassThrough};
use landing_builder::settings::{DEFAULT_SETTINGS_FILE, Settings};
use landing_builder::store::{self, JsonFileStore};
use landing_builder::{admin, options, output, stylesheet};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "landing-builder")]
#[command(about = "Operator-customizable landing page builder")]
#[command(long_about = "\
Operator-customizable landing page builder

The page is one stored HTML template plus a flat set of options. Rendering
replaces the template's <section id=\"hero\"> with a hero built from the
options, swaps image sources by position, and wraps the body with a
generated stylesheet and an optional script.

Typical flow:

  landing-builder activate                  # seed defaults + bundled template
  landing-builder images                    # list image positions
  landing-builder gen-form > form.toml      # documented form with every field
  landing-builder save --form form.toml     # submit the whole form
  landing-builder save --set hero_badge_1=\"New badge\" --set image_overrides[2]=team.webp
  landing-builder render --out index.html

Settings (store path, template asset, log level) come from LANDING_* env
variables, then landing.toml, then defaults.")]
#[command(version)]
struct Cli {
    /// Settings file
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE, global = true)]
    config: PathBuf,

    /// Option store path (overrides settings)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Seed stock options on first run; existing options are left alone
    Activate,
    /// Print (or write) the assembled landing page markup
    Render {
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the generated stylesheet
    Css,
    /// List body images by position, with their overrides
    Images,
    /// Print the admin form page
    Admin,
    /// Submit a form: a complete TOML form and/or individual KEY=VALUE fields
    Save {
        /// Complete form file (see gen-form); absent flags are switched off
        #[arg(long)]
        form: Option<PathBuf>,
        /// Set one field; repeatable. Without --form only these keys change
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
        /// Store HTML, CSS and JS exactly as submitted
        #[arg(long)]
        unfiltered_html: bool,
    },
    /// Show the current options
    Show,
    /// Print a form TOML with every field at its default value
    GenForm,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let store_path = cli.store.unwrap_or(settings.store);
    let option_store = JsonFileStore::new(&store_path);
    info!(store = %store_path.display(), "using option store");

    match cli.command {
        Command::Activate => {
            let seeded = store::activate(&option_store, &settings.template_asset)?;
            output::print_activation(seeded, &store_path);
        }
        Command::Render { out } => {
            let html = page::render(&option_store, &PassThrough);
            match out {
                Some(path) => {
                    std::fs::write(&path, &html)?;
                    println!("Rendered → {}", path.display());
                }
                None => println!("{}", html),
            }
        }
        Command::Css => {
            let options = store::read(&option_store);
            println!("{}", stylesheet::generate_stylesheet(&options));
        }
        Command::Images => {
            let options = store::read(&option_store);
            output::print_image_records(&page::body_images(&options), &options.image_overrides);
        }
        Command::Admin => {
            let options = store::read(&option_store);
            println!("{}", admin::render_admin_page(&options).into_string());
        }
        Command::Save {
            form,
            set,
            unfiltered_html,
        } => {
            let mut submission = match form {
                Some(path) => FormSubmission::from_toml_str(&std::fs::read_to_string(path)?)?,
                None => FormSubmission::patch(),
            };
            for pair in &set {
                submission.insert_pair(pair)?;
            }
            let before = store::read(&option_store);
            let after = store::write(&option_store, &submission, Capability::from_flag(unfiltered_html))?;
            output::print_save_summary(&changed_fields(&before, &after));
        }
        Command::Show => {
            output::print_options(&store::read(&option_store));
        }
        Command::GenForm => {
            print!("{}", options::stock_form_toml());
        }
    }

    Ok(())
}
