use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use vivero::calendar::{CalendarResolver, Hemisphere, UiHelpers, slug_to_activity};
use vivero::collections::{COLLECTIONS_FILENAME, find_collection, load_collections, plants_by_filters};
use vivero::config::{self, PathsConfig, PipelineConfig};
use vivero::content::{ContentIndex, ContentStore};
use vivero::favorites::Favorites;
use vivero::preferences::Preferences;
use vivero::storage::JsonFileStore;
use vivero::{format, output, random, split};

fn version_string() -> &'static str {
    if env!("VIVERO_RELEASE_TAG") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    match env!("VIVERO_GIT_HASH") {
        "" => "dev@unknown",
        hash => Box::leak(format!("dev@{hash}").into_boxed_str()),
    }
}

/// Hemisphere override shared by the calendar commands.
#[derive(clap::Args, Clone)]
struct HemisphereArgs {
    /// northern or southern; defaults to the stored preference, then config
    #[arg(long)]
    hemisphere: Option<Hemisphere>,
}

#[derive(Parser)]
#[command(name = "vivero")]
#[command(about = "Content pipeline and planting calendar for a gardening site")]
#[command(long_about = "\
Content pipeline and planting calendar for a gardening site

Scraped content is formatted and split into per-category files. A three-tier
calendar (global, category, plant) is resolved on top of it.

Data layout:

  public/data/
  ├── pages.json                   # Pages, also used as category landing pages
  ├── posts.json                   # All posts
  ├── posts/<category>.json        # Posts filed under their first category
  ├── collections.json             # Curated plant lists
  └── calendar/
      ├── global-config.json       # Month names, task vocabulary, UI tables
      ├── rosa/index.json          # Category calendar
      └── rosa/banksiae.json       # Plant overrides (\"key\" links to an article)

Calendars are written in northern-hemisphere months; --hemisphere southern
shifts them by six.

Run 'vivero gen-config' to generate a documented vivero.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Project root; relative paths in the config resolve against it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Explicit config file instead of <root>/vivero.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite links and clean up HTML in a scraped content file
    Format { input: PathBuf, output: PathBuf },
    /// Split a content file into pages, posts and per-category files
    Split {
        input: PathBuf,
        /// Output directory (defaults to paths.content_dir)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Categories with post counts
    Categories,
    /// Resolved calendar of one plant
    Calendar {
        category: String,
        plant: String,
        #[command(flatten)]
        hemisphere: HemisphereArgs,
        /// Print the resolved calendar as JSON
        #[arg(long)]
        json: bool,
    },
    /// Plants with an activity in a month
    Month {
        month: i64,
        /// sowing, harvesting, care, ... (or the Spanish slug); all when omitted
        #[arg(long)]
        activity: Option<String>,
        #[command(flatten)]
        hemisphere: HemisphereArgs,
    },
    /// Plants with an activity and its months
    Activity {
        activity: String,
        #[command(flatten)]
        hemisphere: HemisphereArgs,
    },
    /// Care tasks for a month
    Tasks {
        month: i64,
        #[command(flatten)]
        hemisphere: HemisphereArgs,
    },
    /// Static routes for content and calendar pages
    Paths,
    /// Companion plants of a category
    Companions { category: String },
    /// Plants of a curated collection
    Collection { slug: String },
    /// A random plant or category
    Random,
    /// Check every plant calendar against the global vocabulary
    Validate,
    /// Set the stored hemisphere preference
    SetHemisphere { hemisphere: String },
    /// Manage favorite plants
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Print a stock vivero.toml with all options documented
    GenConfig,
}

#[derive(Subcommand)]
enum FavoritesAction {
    List,
    Add { id: String },
    Remove { id: String },
    Clear,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(&cli.root)?,
    };
    let paths = config.paths.resolved(&cli.root);
    init_thread_pool(&config.processing);

    match cli.command {
        Command::Format { input, output } => {
            let count = format::format_file(&input, &output, &config.site.domain)?;
            println!("Formatted {} items → {}", count, output.display());
        }
        Command::Split { input, output } => {
            let output_dir = output.unwrap_or_else(|| paths.content_dir.clone());
            let content = split::split_file(&input, &output_dir)?;
            output::print_split_output(&content);
        }
        Command::Categories => {
            let store = ContentStore::new(&paths.content_dir);
            output::print_category_stats(&store.category_stats()?);
        }
        Command::Calendar {
            category,
            plant,
            hemisphere,
            json,
        } => {
            let hemisphere = effective_hemisphere(&hemisphere, &config, &paths.state_file);
            let resolver = resolver(&paths, &config.site.language);
            let calendar = resolver.resolve(&category, &plant).for_hemisphere(hemisphere);
            if json {
                println!("{}", serde_json::to_string_pretty(&calendar)?);
            } else {
                output::print_calendar(&category, &plant, &calendar, hemisphere, &config.site.language);
            }
        }
        Command::Month {
            month,
            activity,
            hemisphere,
        } => {
            check_month(month)?;
            let hemisphere = effective_hemisphere(&hemisphere, &config, &paths.state_file);
            let resolver = resolver(&paths, &config.site.language);
            let activities = match activity {
                Some(a) => vec![slug_to_activity(&a).to_string()],
                None => resolver.available_activities(),
            };
            let global = resolver.global_config();
            let ui = UiHelpers::new(&global).with_language(&config.site.language);
            for activity in activities {
                println!("{}", ui.format_task_name(&activity));
                output::print_month_plants(&resolver.find_plants_by_month(month, &activity, hemisphere));
            }
        }
        Command::Activity {
            activity,
            hemisphere,
        } => {
            let hemisphere = effective_hemisphere(&hemisphere, &config, &paths.state_file);
            let resolver = resolver(&paths, &config.site.language);
            let matches = resolver.find_plants_by_activity(slug_to_activity(&activity), hemisphere);
            let global = resolver.global_config();
            output::print_activity_matches(
                &matches,
                &UiHelpers::new(&global).with_language(&config.site.language),
            );
        }
        Command::Tasks { month, hemisphere } => {
            check_month(month)?;
            let hemisphere = effective_hemisphere(&hemisphere, &config, &paths.state_file);
            let resolver = resolver(&paths, &config.site.language);
            let overview = resolver.month_overview(month, hemisphere);
            let global = resolver.global_config();
            output::print_month_overview(
                &overview,
                &UiHelpers::new(&global).with_language(&config.site.language),
            );
        }
        Command::Paths => {
            let store = ContentStore::new(&paths.content_dir);
            let mut routes: Vec<String> = store
                .category_paths()?
                .into_iter()
                .map(|c| vivero::types::category_url(&c))
                .collect();
            routes.extend(
                store
                    .plant_paths()?
                    .into_iter()
                    .map(|p| vivero::types::article_url(&p.category, &p.plant)),
            );
            routes.extend(resolver(&paths, &config.site.language).calendar_routes());
            output::print_paths(&routes);
        }
        Command::Companions { category } => {
            let resolver = resolver(&paths, &config.site.language);
            let details = resolver.companion_guide().companions_with_details(&category);
            output::print_companions(&category, &details);
        }
        Command::Collection { slug } => {
            let store = ContentStore::new(&paths.content_dir);
            let collections = load_collections(&paths.content_dir.join(COLLECTIONS_FILENAME))?;
            let collection = find_collection(collections, &slug)?;
            let index = store.index();
            let pages = store.category_pages()?;
            let resolver = CalendarResolver::new(&paths.calendar_dir, index.clone())
                .with_language(&config.site.language);
            let cards = plants_by_filters(&resolver.all_plants(), &index, &pages, &collection.filters);
            output::print_collection(&collection, &cards);
        }
        Command::Random => {
            let store = ContentStore::new(&paths.content_dir);
            let item = random::random_item(&store, config.site.origin())?;
            output::print_random(item.as_ref());
        }
        Command::Validate => {
            let resolver = resolver(&paths, &config.site.language);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_validation_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let report = vivero::calendar::validate_site(&resolver, Some(tx));
            printer.join().map_err(|_| "output thread panicked")?;
            output::print_validation_report(&report);
            if !report.is_clean() {
                std::process::exit(1);
            }
        }
        Command::SetHemisphere { hemisphere } => {
            let mut store = JsonFileStore::open(&paths.state_file);
            match Preferences::new(&mut store).set_hemisphere(&hemisphere)? {
                Some(h) => println!("Hemisphere: {}", h),
                None => return Err(format!("invalid hemisphere '{hemisphere}'").into()),
            }
        }
        Command::Favorites { action } => {
            let mut store = JsonFileStore::open(&paths.state_file);
            let mut favorites = Favorites::new(&mut store);
            match action {
                FavoritesAction::List => {}
                FavoritesAction::Add { id } => {
                    favorites.add(&id)?;
                }
                FavoritesAction::Remove { id } => {
                    favorites.remove(&id)?;
                }
                FavoritesAction::Clear => favorites.clear()?,
            }
            output::print_favorites(&favorites.load(), &favorites.stats());
        }
        Command::GenConfig => unreachable!("handled before config loading"),
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn resolver(paths: &PathsConfig, language: &str) -> CalendarResolver<ContentIndex> {
    CalendarResolver::new(&paths.calendar_dir, ContentStore::new(&paths.content_dir).index())
        .with_language(language)
}

/// Flag, then stored preference, then a southern `TZ`, then the configured default.
fn effective_hemisphere(args: &HemisphereArgs, config: &PipelineConfig, state_file: &Path) -> Hemisphere {
    if let Some(h) = args.hemisphere {
        return h;
    }
    let mut store = JsonFileStore::open(state_file);
    let timezone = std::env::var("TZ").ok();
    Preferences::new(&mut store).effective_hemisphere(timezone.as_deref(), config.default_hemisphere())
}

fn check_month(month: i64) -> Result<(), String> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(format!("month must be between 1 and 12, got {month}"))
    }
}
