//! Catalog records and the form validation boundary.
//!
//! Forms arrive as strings exactly as submitted ([`ProductForm`]). They are
//! validated into a typed [`NewProduct`] before anything touches the catalog,
//! so a rejected submission can never leave a half-parsed record behind.

use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Price, ProductId, ProductStatus};

/// Unit used when the form leaves it blank.
pub const DEFAULT_UNIT: &str = "กก.";

/// Units offered by the product form, as (value, label) pairs.
pub const UNIT_OPTIONS: [(&str, &str); 7] = [
    ("กก.", "Kilogram (กก.)"),
    ("ลูก", "Piece (ลูก)"),
    ("ผล", "Fruit (ผล)"),
    ("กิ่ง", "Bunch (กิ่ง)"),
    ("ถุง", "Bag (ถุง)"),
    ("แผง", "Tray (แผง)"),
    ("มัด", "Bundle (มัด)"),
];

/// Image shown for products created without one.
pub const DEFAULT_IMAGE_URL: &str =
    "https://images.pexels.com/photos/1656663/pexels-photo-1656663.jpeg?auto=compress&cs=tinysrgb&w=300";

/// Errors assigning a product image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("Image link must be a valid http(s) URL")]
    InvalidUrl,
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),
    #[error("Uploaded image is empty")]
    Empty,
}

/// Image reference: either a remote URL or an inline `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductImage(String);

impl ProductImage {
    /// Use a pasted link as the image.
    ///
    /// # Errors
    ///
    /// Returns `ImageError::InvalidUrl` unless `link` is an absolute
    /// `http` or `https` URL.
    pub fn from_url(link: &str) -> Result<Self, ImageError> {
        let parsed = url::Url::parse(link.trim()).map_err(|_| ImageError::InvalidUrl)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ImageError::InvalidUrl);
        }
        Ok(Self(parsed.to_string()))
    }

    /// Encode an uploaded file as an inline `data:` URI for preview.
    ///
    /// # Errors
    ///
    /// Returns `ImageError::Empty` for an empty upload and
    /// `ImageError::UnsupportedType` for anything that is not `image/*`.
    pub fn from_upload(bytes: &[u8], content_type: &str) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        let mime = content_type.trim().to_ascii_lowercase();
        if !mime.starts_with("image/") || mime.contains(['"', ',', ';', ' ']) {
            return Err(ImageError::UnsupportedType(content_type.to_string()));
        }
        Ok(Self(format!("data:{mime};base64,{}", BASE64.encode(bytes))))
    }

    /// The stock photo used when no image is given.
    #[must_use]
    pub fn default_image() -> Self {
        Self(DEFAULT_IMAGE_URL.to_string())
    }

    /// Value for an `<img src>` attribute.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the image is embedded rather than linked.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.0.starts_with("data:")
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub unit: String,
    pub stock: u32,
    pub image: ProductImage,
    #[serde(default)]
    pub status: ProductStatus,
}

impl Product {
    /// Build a new, active product from validated input.
    #[must_use]
    pub fn create(id: ProductId, input: NewProduct) -> Self {
        Self {
            id,
            name: input.name,
            price: input.price,
            unit: input.unit,
            stock: input.stock,
            image: input.image.unwrap_or_else(ProductImage::default_image),
            status: ProductStatus::Active,
        }
    }

    /// Replace every editable field, keeping the ID and status.
    ///
    /// The current image is kept when the edit supplies none.
    pub fn apply_edit(&mut self, input: NewProduct) {
        self.name = input.name;
        self.price = input.price;
        self.unit = input.unit;
        self.stock = input.stock;
        if let Some(image) = input.image {
            self.image = image;
        }
    }

    /// Flip between active and inactive.
    pub const fn toggle_status(&mut self) {
        self.status = self.status.toggled();
    }

    #[must_use]
    pub const fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }
}

/// Product form fields exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub image_url: String,
}

impl ProductForm {
    /// Prefill the form from an existing product.
    ///
    /// Inline images cannot round-trip through a text field, so they leave
    /// the link blank and the edit keeps the current image.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.amount.normalize().to_string(),
            unit: product.unit.clone(),
            stock: product.stock.to_string(),
            image_url: if product.image.is_inline() {
                String::new()
            } else {
                product.image.as_str().to_string()
            },
        }
    }

    /// Validate into a typed product.
    ///
    /// `upload` is an already-encoded uploaded file; it takes precedence over
    /// the pasted link.
    ///
    /// # Errors
    ///
    /// Returns `ProductValidationError::Incomplete` when the name is blank,
    /// the price is not a positive number up to
    /// [`MAX_UNIT_PRICE_BAHT`](crate::types::MAX_UNIT_PRICE_BAHT)
    /// baht, or the stock is not a
    /// non-negative whole number. Returns `ProductValidationError::Image`
    /// when the pasted link is not a valid URL.
    pub fn validate(
        &self,
        upload: Option<ProductImage>,
    ) -> Result<NewProduct, ProductValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ProductValidationError::Incomplete);
        }

        let price = Decimal::from_str(self.price.trim())
            .map(Price::baht)
            .map_err(|_| ProductValidationError::Incomplete)?;
        if !price.is_valid_unit_price() {
            return Err(ProductValidationError::Incomplete);
        }

        let stock = self
            .stock
            .trim()
            .parse::<u32>()
            .map_err(|_| ProductValidationError::Incomplete)?;

        let unit = match self.unit.trim() {
            "" => DEFAULT_UNIT.to_string(),
            unit => unit.to_string(),
        };

        let image = match (upload, self.image_url.trim()) {
            (Some(image), _) => Some(image),
            (None, "") => None,
            (None, link) => Some(ProductImage::from_url(link)?),
        };

        Ok(NewProduct {
            name: name.to_string(),
            price,
            unit,
            stock,
            image,
        })
    }
}

/// Validated product input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub unit: String,
    pub stock: u32,
    pub image: Option<ProductImage>,
}

/// Reasons a product form is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductValidationError {
    #[error("Please complete all fields")]
    Incomplete,
    #[error(transparent)]
    Image(#[from] ImageError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(name: &str, price: &str, stock: &str) -> ProductForm {
        ProductForm {
            name: name.to_string(),
            price: price.to_string(),
            unit: String::new(),
            stock: stock.to_string(),
            image_url: String::new(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_form() {
        let input = form("Corn", "25", "40").validate(None).unwrap();
        assert_eq!(input.name, "Corn");
        assert_eq!(input.price, Price::baht(Decimal::from(25)));
        assert_eq!(input.stock, 40);
        assert_eq!(input.unit, DEFAULT_UNIT);
        assert!(input.image.is_none());
    }

    #[test]
    fn test_validate_rejects_price_above_ceiling() {
        assert_eq!(
            form("Corn", "79228162514264337593543950335", "5").validate(None),
            Err(ProductValidationError::Incomplete)
        );
        assert_eq!(
            form("Corn", "1000000.01", "5").validate(None),
            Err(ProductValidationError::Incomplete)
        );
        assert!(form("Corn", "1000000", "5").validate(None).is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        assert_eq!(
            form("", "25", "40").validate(None),
            Err(ProductValidationError::Incomplete)
        );
        assert_eq!(
            form("   ", "25", "40").validate(None),
            Err(ProductValidationError::Incomplete)
        );
        assert_eq!(
            form("Corn", "", "40").validate(None),
            Err(ProductValidationError::Incomplete)
        );
        assert_eq!(
            form("Corn", "25", "").validate(None),
            Err(ProductValidationError::Incomplete)
        );
    }

    #[test]
    fn test_validate_rejects_unparseable_numbers() {
        assert!(form("Corn", "abc", "40").validate(None).is_err());
        assert!(form("Corn", "25", "forty").validate(None).is_err());
        assert!(form("Corn", "25", "-3").validate(None).is_err());
        assert!(form("Corn", "0", "40").validate(None).is_err());
        assert!(form("Corn", "-1", "40").validate(None).is_err());
    }

    #[test]
    fn test_incomplete_message() {
        assert_eq!(
            ProductValidationError::Incomplete.to_string(),
            "Please complete all fields"
        );
    }

    #[test]
    fn test_validate_image_link() {
        let mut f = form("Corn", "25.50", "4");
        f.image_url = "https://example.com/corn.jpg".to_string();
        let input = f.validate(None).unwrap();
        assert_eq!(
            input.image.unwrap().as_str(),
            "https://example.com/corn.jpg"
        );

        f.image_url = "not a url".to_string();
        assert_eq!(
            f.validate(None),
            Err(ProductValidationError::Image(ImageError::InvalidUrl))
        );

        f.image_url = "javascript:alert(1)".to_string();
        assert!(f.validate(None).is_err());
    }

    #[test]
    fn test_upload_takes_precedence_over_link() {
        let mut f = form("Corn", "25", "4");
        f.image_url = "https://example.com/corn.jpg".to_string();
        let upload = ProductImage::from_upload(b"\x89PNG", "image/png").unwrap();
        let input = f.validate(Some(upload)).unwrap();
        assert!(input.image.unwrap().is_inline());
    }

    #[test]
    fn test_from_upload_encodes_data_uri() {
        let image = ProductImage::from_upload(b"abc", "image/jpeg").unwrap();
        assert_eq!(image.as_str(), "data:image/jpeg;base64,YWJj");
        assert!(image.is_inline());
    }

    #[test]
    fn test_from_upload_rejects_non_images() {
        assert_eq!(
            ProductImage::from_upload(b"abc", "text/html"),
            Err(ImageError::UnsupportedType("text/html".to_string()))
        );
        assert_eq!(
            ProductImage::from_upload(b"", "image/png"),
            Err(ImageError::Empty)
        );
    }

    #[test]
    fn test_create_defaults_to_active_with_stock_photo() {
        let input = form("Corn", "25", "40").validate(None).unwrap();
        let product = Product::create(ProductId::new(4), input);
        assert_eq!(product.status, ProductStatus::Active);
        assert_eq!(product.stock, 40);
        assert_eq!(product.image.as_str(), DEFAULT_IMAGE_URL);
    }

    #[test]
    fn test_edit_preserves_id_status_and_image() {
        let input = form("Corn", "25", "40").validate(None).unwrap();
        let mut product = Product::create(ProductId::new(9), input);
        product.toggle_status();

        let edit = form("Sweet corn", "30", "12").validate(None).unwrap();
        product.apply_edit(edit);

        assert_eq!(product.id, ProductId::new(9));
        assert_eq!(product.name, "Sweet corn");
        assert_eq!(product.stock, 12);
        assert_eq!(product.status, ProductStatus::Inactive);
        assert_eq!(product.image.as_str(), DEFAULT_IMAGE_URL);
    }

    #[test]
    fn test_form_prefill_round_trips() {
        let input = form("Corn", "25.5", "40").validate(None).unwrap();
        let product = Product::create(ProductId::new(1), input);
        let prefilled = ProductForm::from_product(&product);
        assert_eq!(prefilled.price, "25.5");
        assert_eq!(prefilled.stock, "40");
        assert_eq!(prefilled.image_url, DEFAULT_IMAGE_URL);
        assert_eq!(prefilled.validate(None).unwrap().price, product.price);
    }
}
