use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use spooky_playlists::codec::DecodePolicy;
use spooky_playlists::validation::{check_consistency, repair, ConsistencyReport};
use spooky_playlists::{Playlist, PlaylistStore, StoreConfig, Track};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "spooky-playlists")]
#[command(about = "Manage saved SpookyDJ playlists", long_about = None)]
struct Args {
    /// Path to the playlist store document
    #[arg(
        short = 's',
        long,
        default_value = "~/.local/share/spooky-dj/playlists.json"
    )]
    store: String,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Fail a load on the first malformed track record instead of skipping it
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List saved playlist names
    List,

    /// Show the tracks of a playlist
    Show { name: String },

    /// Save files (or URIs) as a playlist, replacing any playlist of that name
    Save {
        name: String,

        /// Audio files or URIs, in playback order
        #[arg(required = true)]
        tracks: Vec<String>,

        /// Mark the track at this position (0-based) to loop; repeatable
        #[arg(long = "loop")]
        loops: Vec<usize>,
    },

    /// Flip the loop flag of one track in a saved playlist
    ToggleLoop { name: String, index: usize },

    /// Delete a playlist
    Delete { name: String },

    /// Check that the name index and stored playlists agree
    Check,

    /// Fix the name index to match the stored playlists
    Repair,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Expand ~ in path
    let store_path = PathBuf::from(shellexpand::tilde(&args.store).as_ref());

    let policy = if args.strict {
        DecodePolicy::Abort
    } else {
        DecodePolicy::Skip
    };
    let config = StoreConfig::new(store_path).with_decode_policy(policy);

    let mut store = PlaylistStore::open(&config)
        .with_context(|| format!("Failed to open playlist store: {:?}", config.path))?;

    match args.command {
        Command::List => {
            let names = store.list_names()?;
            if names.is_empty() {
                println!("No saved playlists yet.");
            }
            for name in names {
                println!("{}", name);
            }
        }

        Command::Show { name } => {
            let decoded = store
                .load_detailed(&name)
                .with_context(|| format!("Failed to load playlist {:?}", name))?;
            if decoded.tracks.is_empty() && !store.contains(&name)? {
                log::warn!("No playlist named {:?}", name);
            }
            for (idx, track) in decoded.tracks.iter().enumerate() {
                let marker = if track.looping { " [loop]" } else { "" };
                println!("{:>3}. {}{}  <{}>", idx, track.display_name, marker, track.source);
            }
            if !decoded.skipped.is_empty() {
                log::warn!("{} unreadable track record(s) skipped", decoded.skipped.len());
            }
        }

        Command::Save {
            name,
            tracks,
            loops,
        } => {
            let name = name.trim();
            if name.is_empty() {
                anyhow::bail!("Playlist name must not be blank");
            }

            let mut playlist = Playlist::new(name);
            for arg in &tracks {
                playlist.add_track(track_from_arg(arg)?);
            }
            for idx in loops {
                let track = playlist
                    .tracks
                    .get_mut(idx)
                    .with_context(|| format!("--loop {} is out of range", idx))?;
                track.set_loop(true);
            }

            store.save_playlist(&playlist)?;
            log::info!("Saved {:?} ({} tracks)", playlist.name, playlist.len());
        }

        Command::ToggleLoop { name, index } => {
            let looping = store
                .toggle_loop(&name, index)
                .with_context(|| format!("Failed to toggle loop in {:?}", name))?;
            log::info!(
                "Track {} of {:?} now {}",
                index,
                name,
                if looping { "loops" } else { "plays once" }
            );
        }

        Command::Delete { name } => {
            store.delete(&name)?;
            log::info!("Deleted {:?}", name);
        }

        Command::Check => {
            let report = check_consistency(&store)?;
            print_report(&report);
            if !report.is_clean() {
                anyhow::bail!("Playlist store has problems");
            }
            log::info!("✅ Playlist store is consistent");
        }

        Command::Repair => {
            let report = repair(&mut store)?;
            print_report(&report);
            if report.is_consistent() {
                log::info!("Nothing to repair");
            } else {
                log::info!("Index repaired");
            }
        }
    }

    Ok(())
}

/// Accept either a URI (kept as-is) or a local file path
fn track_from_arg(arg: &str) -> Result<Track> {
    if arg.contains("://") {
        let label = arg.rsplit('/').next().unwrap_or_default();
        let label = urlencoding::decode(label)
            .map(|l| l.into_owned())
            .unwrap_or_else(|_| label.to_string());
        return Ok(Track::new(arg, label));
    }

    let path = PathBuf::from(arg);
    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .context("Failed to resolve current directory")?
            .join(path)
    };
    Ok(Track::from_path(&path))
}

fn print_report(report: &ConsistencyReport) {
    for name in &report.dangling_names {
        println!("indexed but not stored: {}", name);
    }
    for name in &report.orphan_records {
        println!("stored but not indexed: {}", name);
    }
    for name in &report.corrupt {
        println!("unreadable playlist:    {}", name);
    }
    for (name, skipped) in &report.malformed {
        for record in skipped {
            println!(
                "bad track in {} at {}: {}",
                name, record.position, record.reason
            );
        }
    }
}
