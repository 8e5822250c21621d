//! Grid rendering model
//!
//! Rendering turns a list of items into [`ItemCard`]s: everything a front end
//! needs to draw the grid without reaching back into the snapshot.

use crate::database::{ItemId, WardrobeItem};

/// Date layout for the `Created On:` line
const CREATED_ON_FORMAT: &str = "%m/%d/%Y";

/// Favorite heart state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteIcon {
    Favorite,
    NonFavorite,
}

impl FavoriteIcon {
    pub fn from_flag(is_favorite: bool) -> Self {
        if is_favorite {
            FavoriteIcon::Favorite
        } else {
            FavoriteIcon::NonFavorite
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            FavoriteIcon::Favorite => "favorite-icon",
            FavoriteIcon::NonFavorite => "non-favorite-icon",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            FavoriteIcon::Favorite => FavoriteIcon::NonFavorite,
            FavoriteIcon::NonFavorite => FavoriteIcon::Favorite,
        }
    }
}

/// One labelled line under an item's name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub label: &'static str,
    pub value: String,
}

/// Render model for one grid cell
#[derive(Debug, Clone, PartialEq)]
pub struct ItemCard {
    pub item_id: Option<ItemId>,
    pub name: String,
    pub image: String,
    pub image_alt: String,
    pub favorite: FavoriteIcon,
    pub attributes: Vec<Attribute>,
}

impl ItemCard {
    pub fn from_item(item: &WardrobeItem) -> Self {
        let seasons = item
            .seasons
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let created_on = item
            .created_at
            .map(|dt| dt.format(CREATED_ON_FORMAT).to_string())
            .unwrap_or_default();

        let attributes = vec![
            Attribute { label: "Cost: ", value: item.cost.to_string() },
            Attribute { label: "Size: ", value: item.size.clone() },
            Attribute { label: "Category: ", value: item.category.clone() },
            Attribute { label: "Occasion: ", value: item.occasion.as_str().to_string() },
            Attribute { label: "Season: ", value: seasons },
            Attribute { label: "Brand: ", value: item.brand.clone() },
            Attribute { label: "Created On: ", value: created_on },
        ];

        Self {
            item_id: item.item_id,
            name: item.name.clone(),
            image: item.image.clone(),
            image_alt: item.name.clone(),
            favorite: FavoriteIcon::from_flag(item.is_favorite),
            attributes,
        }
    }

    /// Value of the attribute line labelled `label`
    pub fn attribute(&self, label: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.label.trim_end().trim_end_matches(':') == label.trim_end_matches(':'))
            .map(|a| a.value.as_str())
    }
}

/// The rendered grid, in display order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WardrobeGrid {
    cards: Vec<ItemCard>,
}

impl WardrobeGrid {
    /// Replace the grid contents with cards for `items`
    pub fn render(items: &[WardrobeItem]) -> Self {
        Self {
            cards: items.iter().map(ItemCard::from_item).collect(),
        }
    }

    pub fn cards(&self) -> &[ItemCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, item_id: ItemId) -> Option<&ItemCard> {
        self.cards.iter().find(|c| c.item_id == Some(item_id))
    }

    /// Redraw just the favorite icon of one card. Returns false if the card is not shown.
    pub fn set_favorite(&mut self, item_id: ItemId, is_favorite: bool) -> bool {
        match self.cards.iter_mut().find(|c| c.item_id == Some(item_id)) {
            Some(card) => {
                card.favorite = FavoriteIcon::from_flag(is_favorite);
                true
            }
            None => false,
        }
    }
}
