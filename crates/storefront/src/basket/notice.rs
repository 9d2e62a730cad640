//! User-visible confirmations emitted by basket mutations.

/// Confirmation shown after a basket mutation.
///
/// Screens carry the notice across a redirect as `?notice=<slug>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    CartAdded,
    /// Added to the tray from the Wishlist screen.
    CartAddedFromWishlist,
    WishlistAdded,
    WishlistRemoved,
}

impl Notice {
    /// Short heading, e.g. "Success".
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::CartAdded => "Success",
            Self::CartAddedFromWishlist => "Added",
            Self::WishlistAdded => "Added",
            Self::WishlistRemoved => "Removed",
        }
    }

    /// Body text, e.g. "Item added to tray!".
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::CartAdded => "Item added to tray!",
            Self::CartAddedFromWishlist => "Item added to tray.",
            Self::WishlistAdded => "Item added to wishlist.",
            Self::WishlistRemoved => "Item removed from wishlist.",
        }
    }

    /// Stable identifier used in query strings.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::CartAdded => "cart-added",
            Self::CartAddedFromWishlist => "wishlist-cart-added",
            Self::WishlistAdded => "wishlist-added",
            Self::WishlistRemoved => "wishlist-removed",
        }
    }

    /// Parse a slug produced by [`Notice::slug`].
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "cart-added" => Some(Self::CartAdded),
            "wishlist-cart-added" => Some(Self::CartAddedFromWishlist),
            "wishlist-added" => Some(Self::WishlistAdded),
            "wishlist-removed" => Some(Self::WishlistRemoved),
            _ => None,
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title(), self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trip() {
        for notice in [
            Notice::CartAdded,
            Notice::CartAddedFromWishlist,
            Notice::WishlistAdded,
            Notice::WishlistRemoved,
        ] {
            assert_eq!(Notice::from_slug(notice.slug()), Some(notice));
        }
        assert_eq!(Notice::from_slug("bogus"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Notice::CartAdded.to_string(), "Success: Item added to tray!");
        assert_eq!(
            Notice::CartAddedFromWishlist.to_string(),
            "Added: Item added to tray."
        );
    }
}
