/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Tag and attribute vocabulary of navigation graph files.

pub const ANDROID_URI: &str = "http://schemas.android.com/apk/res/android";
pub const AUTO_URI: &str = "http://schemas.android.com/apk/res-auto";
pub const TOOLS_URI: &str = "http://schemas.android.com/tools";

pub const TAG_NAVIGATION: &str = "navigation";
pub const TAG_FRAGMENT: &str = "fragment";
pub const TAG_ACTIVITY: &str = "activity";
pub const TAG_INCLUDE: &str = "include";
pub const TAG_ACTION: &str = "action";
pub const TAG_DEEP_LINK: &str = "deepLink";

pub const ATTR_ID: &str = "id";
pub const ATTR_LABEL: &str = "label";
pub const ATTR_NAME: &str = "name";
pub const ATTR_LAYOUT: &str = "layout";
pub const ATTR_GRAPH: &str = "graph";
pub const ATTR_DESTINATION: &str = "destination";
pub const ATTR_START_DESTINATION: &str = "startDestination";
pub const ATTR_POP_UP_TO: &str = "popUpTo";
pub const ATTR_URI: &str = "uri";

pub const NEW_ID_PREFIX: &str = "@+id/";
pub const ID_PREFIX: &str = "@id/";
pub const LAYOUT_RESOURCE_PREFIX: &str = "@layout/";
pub const NAVIGATION_RESOURCE_PREFIX: &str = "@navigation/";

/// Kind of a navigation destination, derived from its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestinationKind {
    Fragment,
    Activity,
    Navigation,
    Include,
}

impl DestinationKind {
    /// Returns `None` for tags that are not destinations (actions, deep links,
    /// and anything the schema does not know about).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            TAG_FRAGMENT => Some(Self::Fragment),
            TAG_ACTIVITY => Some(Self::Activity),
            TAG_NAVIGATION => Some(Self::Navigation),
            TAG_INCLUDE => Some(Self::Include),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Fragment => TAG_FRAGMENT,
            Self::Activity => TAG_ACTIVITY,
            Self::Navigation => TAG_NAVIGATION,
            Self::Include => TAG_INCLUDE,
        }
    }

    /// Nested graphs and includes render as small boxes instead of screens.
    pub fn is_compact(self) -> bool {
        matches!(self, Self::Navigation | Self::Include)
    }
}

/// Strips `@+id/` or `@id/` from a resource reference. Bare names pass through.
pub fn strip_id_prefix(value: &str) -> &str {
    value
        .strip_prefix(NEW_ID_PREFIX)
        .or_else(|| value.strip_prefix(ID_PREFIX))
        .unwrap_or(value)
}

/// Resource name of a `@layout/` or `@navigation/` reference.
pub fn resource_name<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    value
        .strip_prefix(prefix)
        .filter(|name| !name.is_empty())
}

pub fn namespace_prefix(uri: &str) -> Option<&'static str> {
    match uri {
        ANDROID_URI => Some("android"),
        AUTO_URI => Some("app"),
        TOOLS_URI => Some("tools"),
        _ => None,
    }
}
