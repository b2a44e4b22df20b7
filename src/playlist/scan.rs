use std::borrow::Cow;
use std::path::{Path, PathBuf};

use lofty::prelude::{Accessor, TaggedFileExt};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::PlaylistSettings;

use super::model::{ArtworkRef, Track};

pub(super) const UNKNOWN_ARTIST: &str = "Unknown artist";

fn normalized(exts: &[String]) -> Vec<String> {
    exts.iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn has_extension(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Look for `<stem>.<ext>` next to `audio` for each artwork extension.
pub(super) fn find_artwork(audio: &Path, artwork_exts: &[String]) -> ArtworkRef {
    for ext in normalized(artwork_exts) {
        let candidate = audio.with_extension(&ext);
        if candidate.is_file() {
            return ArtworkRef::File(candidate);
        }
    }
    ArtworkRef::Placeholder
}

fn read_tags(path: &Path) -> (Option<String>, Option<String>) {
    let Ok(tagged) = lofty::read_from_path(path) else {
        debug!(path = %path.display(), "no readable tags");
        return (None, None);
    };
    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        return (None, None);
    };

    (non_blank(tag.title()), non_blank(tag.artist()))
}

fn non_blank(v: Option<Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Build tracks from the audio files in `dir`, ordered by path.
pub fn scan(dir: &Path, settings: &PlaylistSettings) -> Vec<Track> {
    let exts = normalized(&settings.extensions);

    let mut walker = WalkDir::new(dir).follow_links(true);
    if !settings.recursive {
        walker = walker.max_depth(1);
    }

    let mut paths: Vec<PathBuf> = walker
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && has_extension(p, &exts))
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let (title, artist) = read_tags(&path);
            let title = title.unwrap_or_else(|| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("UNKNOWN")
                    .to_string()
            });
            let artwork = find_artwork(&path, &settings.artwork_extensions);
            Track {
                artist: artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
                title,
                audio: path,
                artwork,
            }
        })
        .collect()
}
