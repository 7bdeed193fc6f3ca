//! CLI command implementations

use crate::headless::{HeadlessPlayer, PlaylistSummary};
use crate::output::{display_option, print_rows, to_json, OutputFormat};
use anyhow::{anyhow, bail, Context};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use marquee_core::{
    Catalog, CatalogEntry, CatalogItem, PlaybackOutcome, PlayerConfig, ResolvedStream,
    StreamDescriptor, StreamKind,
};
use serde::Serialize;
use std::time::Duration;
use tabled::Tabled;
use tracing::{debug, info};
use url::Url;

/// HTTP client honouring the configured timeout
fn http_client(config: &PlayerConfig) -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_millis(config.request_timeout_ms))
        .build()?)
}

/// `http(s)` sources are fetched, anything else is read from disk
fn remote_source(source: &str) -> Option<Url> {
    Url::parse(source)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

/// Load a catalog from a URL or a file
pub async fn load_catalog(config: &PlayerConfig, source: &str) -> anyhow::Result<Catalog> {
    let catalog = match remote_source(source) {
        Some(url) => {
            let spinner = ProgressBar::new_spinner();
            spinner.set_message(format!("Fetching {}", url));
            spinner.enable_steady_tick(Duration::from_millis(100));

            let result = Catalog::fetch(&http_client(config)?, &url).await;
            spinner.finish_and_clear();
            result?
        }
        None => {
            let json = tokio::fs::read_to_string(source)
                .await
                .with_context(|| format!("reading catalog {}", source))?;
            Catalog::from_json(&json)?
        }
    };

    info!(source, items = catalog.len(), "Catalog loaded");
    Ok(catalog)
}

/// One catalog item
#[derive(Debug, Serialize, Tabled)]
pub struct CatalogRow {
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "Streams")]
    pub streams: usize,
}

/// Catalog rows in display order: categories by first appearance
pub fn catalog_rows(catalog: &Catalog) -> Vec<CatalogRow> {
    catalog
        .group_by_category()
        .into_iter()
        .flat_map(|group| {
            group.items.into_iter().map(move |item| CatalogRow {
                category: group.name.to_string(),
                name: item.name.clone(),
                kind: item.item_type.clone(),
                streams: match item.entry() {
                    Some(CatalogEntry::Series(seasons)) => {
                        seasons
                            .iter()
                            .flat_map(|s| &s.episodes)
                            .filter(|e| e.stream.is_some())
                            .count()
                    }
                    Some(CatalogEntry::Stream(_)) => 1,
                    None => 0,
                },
            })
        })
        .collect()
}

/// List a catalog grouped by category
pub async fn catalog(config: &PlayerConfig, source: &str, format: &str) -> anyhow::Result<()> {
    let catalog = load_catalog(config, source).await?;
    let rows = catalog_rows(&catalog);

    match OutputFormat::from(format) {
        OutputFormat::Text => {
            for group in catalog.group_by_category() {
                println!("{}", style(group.name).bold().cyan());
                for item in group.items {
                    let suffix = if item.is_series() {
                        format!(" ({} seasons)", item.seasons.len())
                    } else {
                        String::new()
                    };
                    println!("  {} [{}]{}", item.name, item.item_type, suffix);
                }
            }
        }
        other => print_rows(&rows, other, |_| String::new())?,
    }

    Ok(())
}

/// How a locator resolves
#[derive(Debug, Serialize, Tabled)]
pub struct InspectReport {
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "Locator")]
    pub locator: String,
    #[tabled(rename = "Video ID", display_with = "display_option")]
    pub video_id: Option<String>,
    #[tabled(rename = "Source", display_with = "display_option")]
    pub source: Option<String>,
    #[tabled(rename = "Error", display_with = "display_option")]
    pub error: Option<String>,
}

pub fn inspect_descriptor(config: &PlayerConfig, descriptor: &StreamDescriptor) -> InspectReport {
    let mut report = InspectReport {
        kind: descriptor.kind().wire_name().to_string(),
        locator: descriptor.locator().to_string(),
        video_id: None,
        source: None,
        error: None,
    };

    match ResolvedStream::resolve(descriptor) {
        Ok(ResolvedStream::Embedded { video_id }) => {
            report.source = Some(config.embed_source(&video_id));
            report.video_id = Some(video_id.to_string());
        }
        Ok(ResolvedStream::Progressive { url }) | Ok(ResolvedStream::Adaptive { url }) => {
            report.source = Some(url);
        }
        Err(err) => report.error = Some(err.to_string()),
    }

    report
}

/// Show how a locator resolves
pub fn inspect(
    config: &PlayerConfig,
    kind: StreamKind,
    locator: &str,
    format: &str,
) -> anyhow::Result<()> {
    let report = inspect_descriptor(config, &StreamDescriptor::new(kind, locator));

    match OutputFormat::from(format) {
        OutputFormat::Text => {
            println!("Type:     {}", report.kind);
            println!("Locator:  {}", report.locator);
            if let Some(id) = &report.video_id {
                println!("Video ID: {}", id);
            }
            match (&report.source, &report.error) {
                (Some(source), _) => println!("Source:   {}", style(source).green()),
                (None, Some(err)) => println!("Error:    {}", style(err).red()),
                (None, None) => {}
            }
        }
        other => print_rows(std::slice::from_ref(&report), other, |_| String::new())?,
    }

    if report.error.is_some() {
        bail!("locator does not resolve");
    }
    Ok(())
}

/// Result of starting one catalog stream
#[derive(Debug, Serialize, Tabled)]
pub struct ValidationRow {
    #[tabled(rename = "Stream")]
    pub stream: String,
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "Status")]
    pub status: &'static str,
    #[tabled(rename = "Detail")]
    pub detail: String,
}

fn describe_playlist(summary: &PlaylistSummary) -> String {
    match summary {
        PlaylistSummary::Master {
            variants,
            max_bandwidth,
        } => format!("{} variants, up to {} bps", variants, max_bandwidth),
        PlaylistSummary::Media {
            segments, live: true, ..
        } => format!("live, {} segments", segments),
        PlaylistSummary::Media {
            segments,
            duration_secs,
            ..
        } => format!(
            "{} segments, {}s",
            segments,
            duration_secs.map(|d| d.round() as u64).unwrap_or(0)
        ),
    }
}

/// Check that every stream in a catalog can start
pub async fn validate(
    config: &PlayerConfig,
    source: &str,
    strict: bool,
    format: &str,
) -> anyhow::Result<()> {
    let catalog = load_catalog(config, source).await?;
    let streams = catalog.streams();
    let player = HeadlessPlayer::new(config.clone(), http_client(config)?, true);

    let progress = ProgressBar::new(streams.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut rows = Vec::with_capacity(streams.len());
    for stream in &streams {
        progress.set_message(stream.label.clone());

        let (status, detail) = match player.controller.play(stream.descriptor).await {
            Ok(PlaybackOutcome::Started { kind }) => {
                let detail = match kind {
                    StreamKind::Adaptive => player
                        .last_playlist()
                        .map(|p| describe_playlist(&p))
                        .unwrap_or_default(),
                    _ => display_option(&player.current_source()),
                };
                ("ok", detail)
            }
            Ok(PlaybackOutcome::Superseded { .. }) => ("superseded", String::new()),
            Err(err) => ("fail", err.to_string()),
        };
        debug!(stream = %stream.label, status, "Validated");

        rows.push(ValidationRow {
            stream: stream.label.clone(),
            kind: stream.descriptor.kind().wire_name().to_string(),
            status,
            detail,
        });
        progress.inc(1);
    }
    progress.finish_and_clear();
    player.controller.close();

    let failed = rows.iter().filter(|r| r.status == "fail").count();

    print_rows(&rows, OutputFormat::from(format), |row| {
        let status = if row.status == "ok" {
            style(row.status).green()
        } else {
            style(row.status).red()
        };
        format!("{:>4}  {} [{}] {}", status, row.stream, row.kind, row.detail)
    })?;

    if OutputFormat::from(format) != OutputFormat::Json {
        println!(
            "\nResults: {} passed, {} failed",
            rows.len() - failed,
            failed
        );
    }

    if strict && failed > 0 {
        bail!("{} of {} streams failed", failed, rows.len());
    }
    Ok(())
}

/// Pick the descriptor to play for an item. Series need an episode, given
/// as a title or a 1-based position across all seasons.
pub fn select_stream<'a>(
    item: &'a CatalogItem,
    episode: Option<&str>,
) -> anyhow::Result<(String, &'a StreamDescriptor)> {
    match item.entry() {
        Some(CatalogEntry::Stream(descriptor)) => Ok((item.name.clone(), descriptor)),
        Some(CatalogEntry::Series(seasons)) => {
            let episodes: Vec<_> = seasons
                .iter()
                .flat_map(|season| season.episodes.iter().map(move |e| (season, e)))
                .collect();

            let wanted = episode.ok_or_else(|| {
                let titles: Vec<_> = episodes.iter().map(|(_, e)| e.title.as_str()).collect();
                anyhow!(
                    "'{}' is a series; pick an episode with --episode ({})",
                    item.name,
                    titles.join(", ")
                )
            })?;

            let found = match wanted.parse::<usize>() {
                Ok(n) if n >= 1 => episodes.get(n - 1),
                _ => episodes
                    .iter()
                    .find(|(_, e)| e.title.eq_ignore_ascii_case(wanted)),
            };

            let (season, episode) =
                found.ok_or_else(|| anyhow!("no episode '{}' in '{}'", wanted, item.name))?;
            let descriptor = episode.stream.as_ref().ok_or_else(|| {
                anyhow!("episode '{}' has no supported stream", episode.title)
            })?;
            Ok((
                format!("{} / {} / {}", item.name, season.heading(), episode.title),
                descriptor,
            ))
        }
        None => bail!("'{}' has nothing to play", item.name),
    }
}

/// Outcome of a headless playback
#[derive(Debug, Serialize)]
pub struct PlayReport {
    pub stream: String,
    pub outcome: PlaybackOutcome,
    pub active_backend: String,
    pub playing: bool,
    pub source: Option<String>,
    pub playlist: Option<PlaylistSummary>,
}

/// Play a catalog item headlessly
pub async fn play(
    config: &PlayerConfig,
    source: &str,
    item: &str,
    episode: Option<&str>,
    format: &str,
) -> anyhow::Result<()> {
    let catalog = load_catalog(config, source).await?;
    let entry = catalog
        .find(item)
        .ok_or_else(|| anyhow!("no catalog item named '{}'", item))?;
    let (label, descriptor) = select_stream(entry, episode)?;

    let player = HeadlessPlayer::new(config.clone(), http_client(config)?, false);
    let outcome = player.controller.play(descriptor).await?;

    let report = PlayReport {
        stream: label,
        outcome,
        active_backend: player.controller.active_backend().to_string(),
        playing: player.is_playing(),
        source: player.current_source(),
        playlist: player.last_playlist(),
    };
    player.controller.close();

    match OutputFormat::from(format) {
        OutputFormat::Json => println!("{}", to_json(&report)?),
        _ => {
            println!("{} {}", style("Playing").green().bold(), report.stream);
            println!("  Backend: {}", report.active_backend);
            println!("  Source:  {}", display_option(&report.source));
            if let Some(playlist) = &report.playlist {
                println!("  Stream:  {}", describe_playlist(playlist));
            }
        }
    }

    Ok(())
}
