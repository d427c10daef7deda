//! Selection helpers shared by every playlist mutation.
//!
//! - [`select_in_range`] keeps the entities whose timestamp falls inside an
//!   inclusive range.
//! - [`collect_all_pages`] drains a paginated endpoint.
//! - [`deduplicate_for_insertion`] drops tracks a playlist already contains.
//! - [`batch`] splits a mutation into calls the API accepts.

use std::{cmp::Ordering, collections::HashSet, future::Future, num::NonZeroUsize};

use thiserror::Error;

use crate::{
    dates::{CanonicalInstant, DateInput, DateNormalizer},
    warning,
};

/// Maximum number of items `POST /playlists/{id}/tracks` accepts per call.
pub const PLAYLIST_ADD_LIMIT: NonZeroUsize = NonZeroUsize::new(100).unwrap();

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("invalid range: {start} .. {end}")]
    InvalidBounds {
        start: CanonicalInstant,
        end: CanonicalInstant,
    },
}

/// A record carrying a date that range selection can read.
pub trait TimestampedEntity {
    fn timestamp(&self) -> DateInput;

    /// Track URI, when the record already knows it.
    fn identifier(&self) -> Option<&str> {
        None
    }

    /// Timezone the record's timestamp was written in, if it has none itself.
    fn timezone_hint(&self) -> Option<&str> {
        None
    }
}

impl<T: TimestampedEntity + ?Sized> TimestampedEntity for &T {
    fn timestamp(&self) -> DateInput {
        (**self).timestamp()
    }

    fn identifier(&self) -> Option<&str> {
        (**self).identifier()
    }

    fn timezone_hint(&self) -> Option<&str> {
        (**self).timezone_hint()
    }
}

/// Checks that `start` and `end` form a usable range.
///
/// Bounds must be of the same kind (both naive or both aware) and `start`
/// must not be after `end`.
pub fn check_bounds(start: &CanonicalInstant, end: &CanonicalInstant) -> Result<(), RangeError> {
    match start.partial_cmp(end) {
        Some(Ordering::Less | Ordering::Equal) => Ok(()),
        _ => Err(RangeError::InvalidBounds {
            start: *start,
            end: *end,
        }),
    }
}

/// Returns the entities whose timestamp lies within `start..=end`.
///
/// The result keeps the input order. Entities whose timestamp cannot be
/// normalized, or cannot be compared with the bounds, are skipped with a
/// warning. Invalid bounds yield an empty result. Timestamps are read with
/// the lenient [`DateNormalizer`], see [`select_in_range_with`].
pub fn select_in_range<I, T>(entities: I, start: &CanonicalInstant, end: &CanonicalInstant) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    T: TimestampedEntity,
{
    select_in_range_with(&DateNormalizer::lenient(), entities, start, end)
}

/// [`select_in_range`] with an explicit normalizer.
///
/// With [`DateNormalizer::strict`] an entity whose timezone hint is unknown
/// is skipped instead of being read in local time.
pub fn select_in_range_with<I, T>(
    normalizer: &DateNormalizer,
    entities: I,
    start: &CanonicalInstant,
    end: &CanonicalInstant,
) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    T: TimestampedEntity,
{
    if let Err(e) = check_bounds(start, end) {
        warning!("{}", e);
        return Vec::new();
    }

    entities
        .into_iter()
        .filter(|entity| {
            let label = entity.identifier().unwrap_or("entry");
            match normalizer.normalize(entity.timestamp(), entity.timezone_hint()) {
                Ok(instant) => match (instant.partial_cmp(start), instant.partial_cmp(end)) {
                    (Some(lower), Some(upper)) => {
                        lower != Ordering::Less && upper != Ordering::Greater
                    }
                    _ => {
                        warning!(
                            "Skipping {}: {} cannot be compared with range {} .. {}",
                            label,
                            instant,
                            start,
                            end
                        );
                        false
                    }
                },
                Err(e) => {
                    warning!("Skipping {}: {}", label, e);
                    false
                }
            }
        })
        .collect()
}

/// One page of a paginated endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Opaque cursor for the following page; `None` on the last page.
    pub next: Option<String>,
}

/// Fetches every page of a paginated endpoint and concatenates the items.
///
/// `fetch_page` is called with `None` first and then with each returned
/// cursor until a page without one arrives. Pages are fetched one after the
/// other and the first error aborts the collection.
///
/// # Example
///
/// ```rust,ignore
/// let tracks = collect_all_pages(|next| library::saved_tracks_page(&config, &token, next)).await?;
/// ```
pub async fn collect_all_pages<T, E, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    let mut items = Vec::new();
    let mut cursor = None;

    loop {
        let page = fetch_page(cursor.take()).await?;
        items.extend(page.items);

        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(items)
}

/// Brings a track identifier into the form used for membership tests.
///
/// `https://open.spotify.com/track/<id>?si=…` links become
/// `spotify:track:<id>`. The scheme and type are lowercased, the base-62 id
/// keeps its case.
pub fn normalize_identifier(raw: &str) -> String {
    const LINK_PREFIX: &str = "https://open.spotify.com/";

    let trimmed = raw.trim();

    let link_path = trimmed
        .get(..LINK_PREFIX.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(LINK_PREFIX))
        .map(|_| &trimmed[LINK_PREFIX.len()..]);

    if let Some(path) = link_path {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let mut segments = path
            .split('/')
            .filter(|segment| !segment.is_empty() && !segment.starts_with("intl-"));
        if let (Some(kind), Some(id)) = (segments.next(), segments.next()) {
            return format!("spotify:{}:{}", kind.to_ascii_lowercase(), id);
        }
        return trimmed.to_string();
    }

    let mut parts = trimmed.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(kind), Some(id)) if scheme.eq_ignore_ascii_case("spotify") => {
            format!("spotify:{}:{}", kind.to_ascii_lowercase(), id)
        }
        _ => trimmed.to_string(),
    }
}

/// Returns the candidates that are not already present.
///
/// Both sets are compared on their normalized identifiers and the result
/// holds normalized identifiers. Empty identifiers are dropped.
pub fn deduplicate_for_insertion(
    candidates: &HashSet<String>,
    already_present: &HashSet<String>,
) -> HashSet<String> {
    let present: HashSet<String> = already_present
        .iter()
        .map(|id| normalize_identifier(id))
        .collect();

    candidates
        .iter()
        .map(|id| normalize_identifier(id))
        .filter(|id| !id.is_empty() && !present.contains(id))
        .collect()
}

/// Splits `items` into chunks of `batch_size`; the last chunk may be shorter.
pub fn batch<T>(items: &[T], batch_size: NonZeroUsize) -> impl Iterator<Item = &[T]> {
    items.chunks(batch_size.get())
}
