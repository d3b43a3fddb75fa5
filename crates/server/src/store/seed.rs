//! Sample catalog and back-office accounts written on first start.

use honor_culture_core::Document;
use serde_json::json;

use super::StoreError;
use crate::services::auth::hash_password;

const SEED_ADMINS: &[(&str, &str, &str, &str, &str)] = &[
    ("admin1", "admin", "admin123", "super_admin", "admin@honorfitness.com"),
    (
        "admin2",
        "manager",
        "manager123",
        "product_manager",
        "manager@honorfitness.com",
    ),
];

/// Build the seed document.
///
/// Admin passwords are stored as argon2 hashes.
///
/// # Errors
///
/// Returns `StoreError::Seed` if hashing fails or the literal does not
/// match the document layout.
pub fn seed_document() -> Result<Document, StoreError> {
    let admins = SEED_ADMINS
        .iter()
        .map(|(id, username, password, role, email)| {
            let hash = hash_password(password).map_err(|e| StoreError::Seed(e.to_string()))?;
            Ok(json!({
                "id": id,
                "username": username,
                "password": hash,
                "role": role,
                "email": email,
            }))
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    let mut doc = seed_catalog();
    doc["admins"] = serde_json::Value::Array(admins);

    serde_json::from_value(doc).map_err(|e| StoreError::Seed(e.to_string()))
}

fn seed_catalog() -> serde_json::Value {
    json!({
        "products": [
            {
                "id": "p1",
                "name": "Performance Training Tee",
                "category": "Men's",
                "price": 49.99,
                "colors": ["Black", "Navy", "Gray"],
                "sizes": ["S", "M", "L", "XL"],
                "images": [
                    {"id": "img1", "url": "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?w=800&q=80", "order": 0, "variant": "front"},
                    {"id": "img2", "url": "https://images.unsplash.com/photo-1583743814966-8936f5b7be1a?w=800&q=80", "order": 1, "variant": "back"}
                ],
                "description": "Breathable moisture-wicking training tee for peak performance. Made with premium fabric technology.",
                "inventory": 100,
                "variants": [
                    {"id": "v1", "color": "Black", "size": "S", "sku": "PTT-BLK-S", "stock": 20, "price": 49.99},
                    {"id": "v2", "color": "Black", "size": "M", "sku": "PTT-BLK-M", "stock": 25, "price": 49.99},
                    {"id": "v3", "color": "Black", "size": "L", "sku": "PTT-BLK-L", "stock": 30, "price": 49.99},
                    {"id": "v4", "color": "Navy", "size": "M", "sku": "PTT-NAV-M", "stock": 25, "price": 49.99}
                ],
                "tags": ["performance", "training", "breathable"]
            },
            {
                "id": "p2",
                "name": "Women's Flex Leggings",
                "category": "Women's",
                "price": 89.99,
                "colors": ["Black", "Navy", "Burgundy"],
                "sizes": ["XS", "S", "M", "L"],
                "images": [
                    {"id": "img3", "url": "https://images.unsplash.com/photo-1506629082955-511b1aa562c8?w=800&q=80", "order": 0, "variant": "front"},
                    {"id": "img4", "url": "https://images.unsplash.com/photo-1556906781-9a412961c28c?w=800&q=80", "order": 1, "variant": "lifestyle"}
                ],
                "description": "High-waist compression leggings with 4-way stretch. Perfect for yoga, running, or training.",
                "inventory": 75,
                "variants": [
                    {"id": "v5", "color": "Black", "size": "S", "sku": "WFL-BLK-S", "stock": 15, "price": 89.99},
                    {"id": "v6", "color": "Black", "size": "M", "sku": "WFL-BLK-M", "stock": 20, "price": 89.99},
                    {"id": "v7", "color": "Navy", "size": "M", "sku": "WFL-NAV-M", "stock": 18, "price": 89.99}
                ],
                "tags": ["leggings", "yoga", "compression"]
            },
            {
                "id": "p3",
                "name": "Premium Hoodie",
                "category": "Men's",
                "price": 79.99,
                "colors": ["Black", "Gray", "Olive"],
                "sizes": ["M", "L", "XL"],
                "images": [
                    {"id": "img5", "url": "https://images.unsplash.com/photo-1556821840-3a63f95609a7?w=800&q=80", "order": 0, "variant": "front"}
                ],
                "description": "Soft fleece hoodie for warmups and cool downs. Features adjustable drawstring hood.",
                "inventory": 60,
                "variants": [
                    {"id": "v8", "color": "Black", "size": "M", "sku": "PH-BLK-M", "stock": 20, "price": 79.99}
                ],
                "tags": ["hoodie", "fleece", "warmup"]
            },
            {
                "id": "p4",
                "name": "Sports Duffle Bag",
                "category": "Accessories",
                "price": 69.99,
                "colors": ["Black", "Navy"],
                "sizes": ["One Size"],
                "images": [
                    {"id": "img6", "url": "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?w=800&q=80", "order": 0, "variant": "product"}
                ],
                "description": "Spacious gym bag with separate shoe compartment and water bottle holder.",
                "inventory": 40,
                "variants": [
                    {"id": "v9", "color": "Black", "size": "One Size", "sku": "SDB-BLK-OS", "stock": 25, "price": 69.99}
                ],
                "tags": ["bag", "gym", "accessories"]
            },
            {
                "id": "p5",
                "name": "Running Shorts",
                "category": "Men's",
                "price": 39.99,
                "colors": ["Black", "Navy", "Red"],
                "sizes": ["S", "M", "L", "XL"],
                "images": [
                    {"id": "img7", "url": "https://images.unsplash.com/photo-1591195853828-11db59a44f6b?w=800&q=80", "order": 0, "variant": "front"}
                ],
                "description": "Lightweight running shorts with built-in liner and secure zip pocket.",
                "inventory": 90,
                "variants": [
                    {"id": "v10", "color": "Black", "size": "M", "sku": "RS-BLK-M", "stock": 30, "price": 39.99}
                ],
                "tags": ["shorts", "running", "lightweight"]
            },
            {
                "id": "p6",
                "name": "Yoga Mat",
                "category": "Accessories",
                "price": 54.99,
                "colors": ["Purple", "Blue", "Pink"],
                "sizes": ["One Size"],
                "images": [
                    {"id": "img8", "url": "https://images.unsplash.com/photo-1601925260368-ae2f83cf8b7f?w=800&q=80", "order": 0, "variant": "product"}
                ],
                "description": "Premium non-slip yoga mat with carrying strap. 6mm thickness for comfort.",
                "inventory": 50,
                "variants": [
                    {"id": "v11", "color": "Purple", "size": "One Size", "sku": "YM-PUR-OS", "stock": 15, "price": 54.99}
                ],
                "tags": ["yoga", "mat", "accessories"]
            }
        ],
        "categories": [
            {"id": "cat1", "name": "Men's", "description": "Men's athletic wear", "subcategories": ["Tops", "Bottoms", "Outerwear"]},
            {"id": "cat2", "name": "Women's", "description": "Women's athletic wear", "subcategories": ["Tops", "Bottoms", "Outerwear"]},
            {"id": "cat3", "name": "Accessories", "description": "Gym and training accessories", "subcategories": ["Bags", "Equipment", "Recovery"]}
        ],
        "admins": [],
        "orders": [],
        "auditLog": []
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use honor_culture_core::AdminRole;

    #[test]
    fn test_seed_document_shape() {
        let doc = seed_document().unwrap();
        assert_eq!(doc.products.len(), 6);
        assert_eq!(doc.categories.len(), 3);
        assert!(doc.orders.is_empty());
        assert!(doc.audit_log.is_empty());

        let admin = doc.admins.iter().find(|a| a.username == "admin").unwrap();
        assert_eq!(admin.role, AdminRole::SuperAdmin);
        assert!(admin.password.starts_with("$argon2"));
        assert_ne!(admin.password, "admin123");
    }
}
