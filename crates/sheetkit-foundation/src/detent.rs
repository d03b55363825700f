//! Detent descriptors and their identifiers.

use std::borrow::Cow;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use sheetkit_ui_graphics::{EdgeInsets, Size};

/// String-keyed identity of a detent.
///
/// Two detents are the same detent exactly when their ids are equal.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DetentId(Cow<'static, str>);

static MEDIUM_ID: DetentId = DetentId::MEDIUM;
static LARGE_ID: DetentId = DetentId::LARGE;
static HIDDEN_ID: DetentId = DetentId::HIDDEN;

static NEXT_GENERATED_ID: AtomicU64 = AtomicU64::new(1);

impl DetentId {
    pub const MEDIUM: DetentId = DetentId(Cow::Borrowed("medium"));
    pub const LARGE: DetentId = DetentId(Cow::Borrowed("large"));
    pub const HIDDEN: DetentId = DetentId(Cow::Borrowed("hidden"));

    pub fn new(raw: impl Into<Cow<'static, str>>) -> Self {
        Self(raw.into())
    }

    /// A fresh id, unique for the lifetime of the process.
    pub fn generate() -> Self {
        let n = NEXT_GENERATED_ID.fetch_add(1, Ordering::Relaxed);
        Self(Cow::Owned(format!("custom-{n}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_hidden(&self) -> bool {
        *self == HIDDEN_ID
    }
}

impl fmt::Debug for DetentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DetentId({})", self.0)
    }
}

impl fmt::Display for DetentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for DetentId {
    fn from(raw: &'static str) -> Self {
        Self(Cow::Borrowed(raw))
    }
}

impl From<String> for DetentId {
    fn from(raw: String) -> Self {
        Self(Cow::Owned(raw))
    }
}

/// Inputs a custom detent resolves its height from.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ResolverContext {
    /// Size of the container the sheet lays out in.
    pub content_size: Size,
    pub safe_area: EdgeInsets,
}

/// Pure function from container geometry to a detent height.
///
/// Heights are cached per container size, so a resolver must return the same
/// value for the same context.
pub type DetentResolver = Rc<dyn Fn(&ResolverContext) -> f32>;

/// Content that can report the height it wants inside a given container.
pub trait PreferredHeight {
    fn preferred_height(&self, fitting: Size) -> f32;
}

/// A named rest height for the sheet.
#[derive(Clone, Default)]
pub enum Detent {
    /// Half of the container.
    #[default]
    Medium,
    /// The container minus its top safe area.
    Large,
    /// Near-zero height, for hiding the sheet without tearing it down.
    Hidden,
    Custom {
        id: DetentId,
        resolver: DetentResolver,
    },
}

impl Detent {
    /// Custom detent with a generated id.
    pub fn custom(resolver: impl Fn(&ResolverContext) -> f32 + 'static) -> Self {
        Self::custom_with_id(DetentId::generate(), resolver)
    }

    /// Custom detent with a caller-chosen id. Reusing the id across detent
    /// invalidation keeps the sheet on this detent.
    pub fn custom_with_id(
        id: impl Into<DetentId>,
        resolver: impl Fn(&ResolverContext) -> f32 + 'static,
    ) -> Self {
        Detent::Custom {
            id: id.into(),
            resolver: Rc::new(resolver),
        }
    }

    /// Custom detent at a constant height.
    pub fn fixed(id: impl Into<DetentId>, height: f32) -> Self {
        Self::custom_with_id(id, move |_| height)
    }

    /// Detent sized to the content's preferred height, capped at the container.
    ///
    /// The content is held weakly; once it is gone the detent resolves to 0.
    pub fn self_sized<C>(content: &Rc<C>) -> Self
    where
        C: PreferredHeight + ?Sized + 'static,
    {
        let content: Weak<C> = Rc::downgrade(content);
        Self::custom(move |context| {
            let preferred = content
                .upgrade()
                .map(|content| content.preferred_height(context.content_size))
                .unwrap_or(0.0);
            preferred.min(context.content_size.height)
        })
    }

    pub fn id(&self) -> &DetentId {
        match self {
            Detent::Medium => &MEDIUM_ID,
            Detent::Large => &LARGE_ID,
            Detent::Hidden => &HIDDEN_ID,
            Detent::Custom { id, .. } => id,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.id().is_hidden()
    }
}

impl PartialEq for Detent {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Detent {}

impl fmt::Debug for Detent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detent::Medium => f.write_str("Medium"),
            Detent::Large => f.write_str("Large"),
            Detent::Hidden => f.write_str("Hidden"),
            Detent::Custom { id, .. } => f.debug_struct("Custom").field("id", id).finish(),
        }
    }
}

#[cfg(test)]
#[path = "tests/detent_tests.rs"]
mod tests;
