//! The storefront's fixed product catalog.

use super::models::{Category, Product};

const IMAGE_BASE: &str = "https://images.unsplash.com";

fn image(photo: &str) -> String {
    format!("{IMAGE_BASE}/{photo}?q=80&w=800&auto=format&fit=crop")
}

/// The in-memory catalog shipped with the storefront.
pub fn default_catalog() -> Vec<Product> {
    use Category::*;

    let entries: [(&str, &str, Category, u32, &str, &str, f32); 17] = [
        ("1", "The Chesterfield Sofa", LivingRoom, 185_000, "photo-1550581190-9c1c48d21d6c",
            "A classic velvet chesterfield sofa in deep emerald green. Features deep button tufting and rolled arms.", 4.8),
        ("2", "Minimalist Oak Chair", Dining, 35_000, "photo-1592078615290-033ee584e267",
            "Solid oak dining chair with a woven paper cord seat. Scandinavian design at its finest.", 4.5),
        ("3", "Marble Coffee Table", LivingRoom, 85_000, "photo-1533090161767-e6ffed986c88",
            "Genuine Carrara marble top with a matte black steel frame. Elegant and durable.", 4.9),
        ("4", "Artisan Bed Frame", Bedroom, 125_000, "photo-1617325247661-675ab4b64ae2",
            "Hand-crafted walnut bed frame with a sleek, low-profile design.", 4.7),
        ("5", "Mid-Century Desk", Office, 65_000, "photo-1518455027359-f3f8164ba6bd",
            "A compact writing desk with ample storage and tapered legs.", 4.6),
        ("6", "Velvet Lounge Chair", LivingRoom, 55_000, "photo-1567538096630-e0c55bd6374c",
            "Plush velvet armchair in dusty rose, perfect for a reading nook.", 4.4),
        ("7", "Geometric Bookcase", Office, 45_000, "photo-1594620302200-9a762244a156",
            "Five-tier open bookshelf with a geometric metal frame and reclaimed wood shelves.", 4.3),
        ("8", "Teak Garden Set", LivingRoom, 225_000, "photo-1600210492486-724fe5c67fb0",
            "Weather-resistant teak seating set for outdoor luxury living.", 4.9),
        ("9", "Modern Platform Bed", Bedroom, 95_000, "photo-1505693314120-0d443867891c",
            "Low-profile platform bed with a padded headboard upholstered in grey linen.", 4.6),
        ("10", "Scandi Dining Table", Dining, 110_000, "photo-1530018607912-eff2daa1bac4",
            "Minimalist white oak dining table that comfortably seats six people.", 4.8),
        ("11", "Executive Office Chair", Office, 42_000, "photo-1505843490538-5133c6c7d0e1",
            "Ergonomic high-back leather chair with adjustable lumbar support.", 4.5),
        ("12", "Bouclé Swivel Chair", LivingRoom, 58_000, "photo-1586023492125-27b2c045efd7",
            "Trendy white bouclé fabric swivel chair, adding texture and softness to any room.", 4.7),
        ("13", "Luxe Velvet Ottoman", LivingRoom, 28_000, "photo-1586158291800-2665f07bba79",
            "A versatile velvet ottoman, perfect as a footrest or extra seating.", 4.6),
        ("15", "Industrial Bar Stool", Office, 16_500, "photo-1519947486511-46149fa0a254",
            "Adjustable height bar stool with a rustic wooden seat and black metal base.", 4.4),
        ("17", "Royal Wingback Bed", Bedroom, 155_000, "photo-1560185893-a55cbc8c57e8",
            "Luxurious wingback headboard upholstered in premium beige linen for a hotel-like feel.", 4.9),
        ("18", "Oak Bedside Table", LivingRoom, 24_000, "photo-1533090481720-856c6e3c1fdc",
            "Compact solid oak table with a single drawer for bedside essentials.", 4.5),
        ("20", "Arch Floor Mirror", LivingRoom, 32_000, "photo-1618220179428-22790b461013",
            "Full-length standing mirror with an elegant gold-finished arch frame.", 4.8),
    ];

    entries
        .into_iter()
        .map(|(id, name, category, price, photo, description, rating)| {
            Product::new(id, name, category, price, image(photo), description, rating)
        })
        .collect()
}

/// Resolve recommended ids against a catalog, keeping recommendation order.
///
/// Unknown ids are skipped; duplicates resolve once.
pub fn find_products<'a>(catalog: &'a [Product], ids: &[String]) -> Vec<&'a Product> {
    let mut found: Vec<&Product> = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(product) = catalog.iter().find(|p| p.id() == id) {
            if !found.iter().any(|f| f.id() == product.id()) {
                found.push(product);
            }
        }
    }
    found
}
