use serde::{Deserialize, Serialize};

/// A furniture item in the storefront catalog.
///
/// The AI core only ever reads products; the catalog is owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: String,
    name: String,
    category: Category,
    price: u32,
    image: String,
    description: String,
    rating: f32,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        price: u32,
        image: impl Into<String>,
        description: impl Into<String>,
        rating: f32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            price,
            image: image.into(),
            description: description.into(),
            rating,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn price(&self) -> u32 {
        self.price
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn rating(&self) -> f32 {
        self.rating
    }

    /// Price as shown in the storefront, e.g. `Rs. 185,000`.
    pub fn display_price(&self) -> String {
        let digits = self.price.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        format!("Rs. {grouped}")
    }

    /// The reduced field set sent to the provider.
    pub fn projection(&self) -> CatalogProjection<'_> {
        CatalogProjection {
            id: &self.id,
            name: &self.name,
            category: self.category,
            description: &self.description,
        }
    }
}

/// Outbound view of a [`Product`]: price, image and rating are left out to
/// keep the prompt small.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CatalogProjection<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub category: Category,
    pub description: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Living Room")]
    LivingRoom,
    Bedroom,
    Dining,
    Office,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::LivingRoom => "Living Room",
            Category::Bedroom => "Bedroom",
            Category::Dining => "Dining",
            Category::Office => "Office",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
