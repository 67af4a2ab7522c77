use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use m3u_filter::{
    config::Config,
    ingestor,
    models::{FilterSpec, Playlist},
    proxy::{
        filter_engine::{entries_in_group, filter_by_groups},
        live_filter::filter_live,
        generator::{debug_listing, list_all, render_with_mode, GroupFilterReport},
        group_catalog::{group_counts, list_groups, list_groups_sorted},
        FilterEngine, FilterOutcome, LiteralMatcher, RenderMode,
    },
    sources::{
        load_allowed_groups, load_filter_spec, load_filter_spec_lenient, load_playlist,
        parse_group_list, CacheMode, M3uSourceFetcher, PanelData, PanelFilter, SourceCache,
    },
};

#[derive(Parser)]
#[command(name = "m3u-filter")]
#[command(version)]
#[command(about = "Filter and regroup M3U playlists with JSON filter specs")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Playlist file path or http(s) URL
    #[arg(short, long, value_name = "PATH|URL", global = true)]
    source: Option<String>,

    /// Cache mode: no, use, force-clear (overrides config file)
    #[arg(long, value_name = "MODE", global = true)]
    cache: Option<CacheMode>,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<PathBuf>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List distinct groups
    ListGroups {
        /// Sort case-insensitively instead of first-seen order
        #[arg(long)]
        sorted: bool,
        /// Show the number of entries in each group
        #[arg(long)]
        counts: bool,
    },
    /// List channel names within a group
    ListGroup { name: String },
    /// List every entry as `group <--> name`
    ListAll,
    /// Apply JSON filter specs and render the union of their matches
    Filter {
        /// Filter spec file; repeat to combine several specs
        #[arg(long = "spec", value_name = "FILE", required = true)]
        specs: Vec<PathBuf>,
        /// Print `group - name` pairs instead of a playlist
        #[arg(long)]
        debug: bool,
        /// Fail on missing or invalid spec files instead of treating them as empty
        #[arg(long)]
        strict_spec: bool,
        /// Treat name_matches as plain substrings rather than regular expressions
        #[arg(long)]
        literal: bool,
        /// Render mode: reconstructed or original (overrides config file)
        #[arg(long, value_name = "MODE")]
        render: Option<RenderMode>,
    },
    /// Keep entries whose group is in a list, groups unchanged
    Groups {
        /// Comma-separated group names
        #[arg(long)]
        groups: Option<String>,
        /// File with one group name per line
        #[arg(long, value_name = "FILE")]
        groups_file: Option<PathBuf>,
        /// Print a diagnostic report instead of a playlist
        #[arg(long)]
        debug: bool,
        /// Emit the source descriptor lines verbatim
        #[arg(long)]
        raw: bool,
    },
    /// Drop series and movie entries
    TrimLive {
        /// Restrict output to the groups listed in this file
        #[arg(long, value_name = "FILE")]
        groups_file: Option<PathBuf>,
        /// Print filter statistics to stderr
        #[arg(long)]
        stats: bool,
    },
    /// Build a playlist from an Xtream panel dump, keeping included live categories
    Panel {
        /// Panel JSON (server_info, user_info, categories, available_channels)
        #[arg(long, value_name = "FILE")]
        panel: PathBuf,
        /// Filter JSON with an `included_categories` list
        #[arg(long, value_name = "FILE", required_unless_present = "list_categories")]
        filter: Option<PathBuf>,
        /// Print every live category name as `{"all_categories": [...]}` instead
        #[arg(long)]
        list_categories: bool,
    },
    /// Remove the cached copy of --source, or every cached playlist
    ClearCache,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    m3u_filter::logging::init(&cli.log_level).context("Failed to initialise logging")?;
    info!("Starting m3u-filter v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load_from_file(&cli.config)?;
    let cache = SourceCache::new(config.cache.directory.clone());
    let output = cli.output.as_ref();

    match &cli.command {
        Command::ClearCache => clear_cache(&cache, cli.source.as_deref()),
        Command::ListGroups { sorted, counts } => {
            let (_, entries) = load_entries(&cli, &config, &cache).await?;
            let text: String = if *counts {
                group_counts(&entries)
                    .into_iter()
                    .map(|(group, count)| format!("{} ({})\n", group, count))
                    .collect()
            } else if *sorted {
                lines(&list_groups_sorted(&entries))
            } else {
                lines(&list_groups(&entries))
            };
            emit(output, &text)
        }
        Command::ListGroup { name } => {
            let (_, entries) = load_entries(&cli, &config, &cache).await?;
            let names: Vec<String> = entries_in_group(&entries, name)
                .into_iter()
                .map(|entry| entry.name)
                .collect();
            emit(output, &lines(&names))
        }
        Command::ListAll => {
            let (_, entries) = load_entries(&cli, &config, &cache).await?;
            emit(output, &list_all(&entries))
        }
        Command::Filter {
            specs,
            debug,
            strict_spec,
            literal,
            render,
        } => {
            let filter_specs = specs
                .iter()
                .map(|path| {
                    if *strict_spec {
                        load_filter_spec(path)
                            .with_context(|| format!("Invalid filter spec {}", path.display()))
                    } else {
                        Ok(load_filter_spec_lenient(path))
                    }
                })
                .collect::<Result<Vec<FilterSpec>>>()?;

            let (_, entries) = load_entries(&cli, &config, &cache).await?;
            let outcome = if *literal {
                FilterEngine::with_matcher(LiteralMatcher).apply_filters(&entries, &filter_specs)
            } else {
                FilterEngine::new().apply_filters(&entries, &filter_specs)
            };

            let text = if *debug {
                debug_listing(&outcome.entries)
            } else {
                render_with_mode(&outcome.entries, render.unwrap_or(config.render.mode))
            };
            emit(output, &text)?;
            report_spec_failures(&outcome, specs, &mut std::io::stderr().lock())
        }
        Command::Groups {
            groups,
            groups_file,
            debug,
            raw,
        } => {
            let mut requested = groups.as_deref().map(parse_group_list).unwrap_or_default();
            if let Some(path) = groups_file {
                let mut from_file: Vec<String> = load_allowed_groups(path)
                    .ok_or_else(|| anyhow!("Cannot read groups file {}", path.display()))?
                    .into_iter()
                    .collect();
                from_file.sort();
                requested.extend(from_file);
            }
            if requested.is_empty() {
                return Err(anyhow!("Provide --groups or --groups-file"));
            }

            let (source, entries) = load_entries(&cli, &config, &cache).await?;
            let filtered = filter_by_groups(&entries, &requested);
            if *debug {
                let report = GroupFilterReport {
                    requested_groups: requested,
                    source,
                    initial_count: entries.len(),
                    filtered_count: filtered.len(),
                    available_groups: list_groups(&entries),
                };
                emit(output, &report.to_string())
            } else {
                let mode = if *raw {
                    RenderMode::Original
                } else {
                    config.render.mode
                };
                emit(output, &render_with_mode(&filtered, mode))
            }
        }
        Command::Panel {
            panel,
            filter,
            list_categories,
        } => {
            let panel_data = PanelData::load(panel)
                .with_context(|| format!("Failed to load panel {}", panel.display()))?;
            if *list_categories {
                let listing = serde_json::json!({
                    "all_categories": panel_data.live_category_names()
                });
                return emit(output, &format!("{}\n", serde_json::to_string_pretty(&listing)?));
            }

            let panel_filter = match filter {
                Some(path) => PanelFilter::load(path)
                    .with_context(|| format!("Failed to load panel filter {}", path.display()))?,
                None => PanelFilter::default(),
            };
            let entries = panel_data.entries(&panel_filter);
            emit(output, &render_with_mode(&entries, config.render.mode))
        }
        Command::TrimLive { groups_file, stats } => {
            let allowed: Option<HashSet<String>> =
                groups_file.as_ref().and_then(|path| load_allowed_groups(path));
            let (_, entries) = load_entries(&cli, &config, &cache).await?;
            let (kept, live_stats) = filter_live(&entries, allowed.as_ref())?;
            if *stats {
                eprintln!("{}", live_stats);
            }
            emit(output, &render_with_mode(&kept, config.render.mode))
        }
    }
}

/// Fetch (or read from cache) and parse the playlist named by `--source`
async fn load_entries(
    cli: &Cli,
    config: &Config,
    cache: &SourceCache,
) -> Result<(String, Playlist)> {
    let source = cli
        .source
        .clone()
        .ok_or_else(|| anyhow!("--source is required for this command"))?;
    let cache_mode = cli.cache.unwrap_or(config.cache.default_mode);

    let fetcher = M3uSourceFetcher::new(&config.source)?;
    let content = load_playlist(&fetcher, cache, cache_mode, &source)
        .await
        .with_context(|| format!("Failed to load playlist from {}", source))?;

    Ok((source, ingestor::parse(&content)))
}

fn clear_cache(cache: &SourceCache, source: Option<&str>) -> Result<()> {
    match source {
        Some(source) => {
            let existed = cache.clear(source)?;
            eprintln!(
                "{} cached copy of {}",
                if existed { "Removed" } else { "No" },
                source
            );
        }
        None => {
            let removed = cache.clear_all()?;
            eprintln!(
                "Removed {} cached playlists from {}",
                removed,
                cache.directory().display()
            );
        }
    }
    Ok(())
}

/// Write one line per failed spec to `err` and turn an incomplete outcome
/// into an error so the process exits non-zero after the partial output.
fn report_spec_failures<W: Write>(
    outcome: &FilterOutcome,
    specs: &[PathBuf],
    err: &mut W,
) -> Result<()> {
    if outcome.is_complete() {
        return Ok(());
    }
    for failure in &outcome.failures {
        let label = specs
            .get(failure.index)
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| format!("spec #{}", failure.index));
        writeln!(err, "{}: {}", label, failure.error)?;
    }
    Err(anyhow!(
        "{} of {} filter specs failed; output is incomplete",
        outcome.failures.len(),
        specs.len()
    ))
}

fn lines(values: &[String]) -> String {
    values.iter().map(|value| format!("{}\n", value)).collect()
}

fn emit(output: Option<&PathBuf>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} bytes to {}", text.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use m3u_filter::errors::PatternError;
    use m3u_filter::models::{Entry, FilterSpec, GroupRule};
    use m3u_filter::proxy::SpecFailure;

    fn spec_paths() -> Vec<PathBuf> {
        vec![PathBuf::from("broken.json"), PathBuf::from("sports.json")]
    }

    #[test]
    fn test_complete_outcome_reports_nothing() {
        let outcome = FilterOutcome {
            entries: vec![Entry::new("#EXTINF:-1,A", "http://x/1")],
            failures: Vec::new(),
        };
        let mut err = Vec::new();

        assert!(report_spec_failures(&outcome, &spec_paths(), &mut err).is_ok());
        assert!(err.is_empty());
    }

    #[test]
    fn test_failed_spec_is_reported_and_fails_the_command() {
        let specs = vec![
            FilterSpec::new("Broken", vec![GroupRule::group_with_names("*", ["(unclosed"])]),
            FilterSpec::new("Sports", vec![GroupRule::group("Sports")]),
        ];
        let entries = ingestor::parse(
            "#EXTM3U\n#EXTINF:-1 tvg-name=\"A\" group-title=\"Sports\",A\nhttp://x/1\n",
        );
        let outcome = FilterEngine::new().apply_filters(&entries, &specs);
        assert_eq!(outcome.entries.len(), 1);

        let mut err = Vec::new();
        let result = report_spec_failures(&outcome, &spec_paths(), &mut err);

        let message = result.unwrap_err().to_string();
        assert_eq!(message, "1 of 2 filter specs failed; output is incomplete");
        let stderr = String::from_utf8(err).unwrap();
        assert!(stderr.starts_with("broken.json: Invalid name pattern '(unclosed'"));
        assert!(!stderr.contains("sports.json"));
    }

    #[test]
    fn test_failure_without_matching_path_uses_index() {
        let outcome = FilterOutcome {
            entries: Vec::new(),
            failures: vec![SpecFailure {
                index: 5,
                error: PatternError::new("[", "unclosed character class"),
            }],
        };
        let mut err = Vec::new();

        assert!(report_spec_failures(&outcome, &spec_paths(), &mut err).is_err());
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "spec #5: Invalid name pattern '[': unclosed character class\n"
        );
    }
}
