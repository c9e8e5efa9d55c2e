//! Product catalog repository.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use farm2hand_core::ProductId;
use farm2hand_core::ProductStatus;
use farm2hand_core::product::{NewProduct, Product};

use super::RepositoryError;

/// Catalog products keyed by ID, listed in ID order.
#[derive(Debug)]
pub struct ProductRepository {
    products: BTreeMap<ProductId, Product>,
    /// `None` once `u32::MAX` has been handed out.
    next_id: Option<ProductId>,
}

impl ProductRepository {
    /// Create a repository holding `products`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if two products share an ID.
    pub fn new(products: impl IntoIterator<Item = Product>) -> Result<Self, RepositoryError> {
        let mut repo = Self {
            products: BTreeMap::new(),
            next_id: Some(ProductId::new(1)),
        };
        for product in products {
            let id = product.id;
            if repo.products.insert(id, product).is_some() {
                return Err(RepositoryError::Conflict(format!("duplicate product id {id}")));
            }
            if repo.next_id.is_some_and(|next| id >= next) {
                repo.next_id = id.checked_next();
            }
        }
        Ok(repo)
    }

    pub fn list(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    pub fn get_mut(&mut self, id: ProductId) -> Option<&mut Product> {
        self.products.get_mut(&id)
    }

    /// Add a new active product under a fresh ID.
    ///
    /// IDs are never reused, even after the highest one is deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when no IDs are left, or if the
    /// fresh ID is somehow taken. Nothing is inserted in either case.
    pub fn create(&mut self, input: NewProduct) -> Result<&Product, RepositoryError> {
        let id = self
            .next_id
            .ok_or_else(|| RepositoryError::Conflict("no product ids left".to_string()))?;
        match self.products.entry(id) {
            Entry::Vacant(slot) => {
                self.next_id = id.checked_next();
                Ok(slot.insert(Product::create(id, input)))
            }
            Entry::Occupied(_) => Err(RepositoryError::Conflict(format!(
                "product id {id} is already taken"
            ))),
        }
    }

    /// Replace a product's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    pub fn update(&mut self, id: ProductId, input: NewProduct) -> Result<&Product, RepositoryError> {
        let product = self.get_mut(id).ok_or_else(|| not_found(id))?;
        product.apply_edit(input);
        Ok(product)
    }

    /// Flip a product between active and inactive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    pub fn toggle_status(&mut self, id: ProductId) -> Result<ProductStatus, RepositoryError> {
        let product = self.get_mut(id).ok_or_else(|| not_found(id))?;
        product.toggle_status();
        Ok(product.status)
    }

    /// Remove exactly one product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    pub fn delete(&mut self, id: ProductId) -> Result<Product, RepositoryError> {
        self.products.remove(&id).ok_or_else(|| not_found(id))
    }
}

fn not_found(id: ProductId) -> RepositoryError {
    RepositoryError::NotFound(format!("product {id}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use farm2hand_core::product::ProductForm;

    use super::*;
    use crate::store::SeedData;

    fn repo() -> ProductRepository {
        ProductRepository::new(SeedData::builtin().products).unwrap()
    }

    fn input(name: &str, price: &str, stock: &str) -> NewProduct {
        ProductForm {
            name: name.to_string(),
            price: price.to_string(),
            stock: stock.to_string(),
            ..ProductForm::default()
        }
        .validate(None)
        .unwrap()
    }

    #[test]
    fn test_create_appends_active_product() {
        let mut repo = repo();
        let created = repo.create(input("Corn", "25", "40")).unwrap().clone();
        assert_eq!(repo.len(), 4);
        assert_eq!(created.id, ProductId::new(4));
        assert_eq!(created.stock, 40);
        assert_eq!(created.status, ProductStatus::Active);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let mut repo = repo();
        repo.delete(ProductId::new(3)).unwrap();
        let created = repo.create(input("Corn", "25", "40")).unwrap();
        assert_eq!(created.id, ProductId::new(4));
    }

    #[test]
    fn test_delete_removes_only_that_product() {
        let mut repo = repo();
        let removed = repo.delete(ProductId::new(2)).unwrap();
        assert_eq!(removed.id, ProductId::new(2));
        let ids: Vec<u32> = repo.list().map(|p| p.id.as_u32()).collect();
        assert_eq!(ids, [1, 3]);
        assert!(matches!(
            repo.delete(ProductId::new(2)),
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[test]
    fn test_toggle_status() {
        let mut repo = repo();
        assert_eq!(
            repo.toggle_status(ProductId::new(3)).unwrap(),
            ProductStatus::Active
        );
        assert_eq!(
            repo.toggle_status(ProductId::new(3)).unwrap(),
            ProductStatus::Inactive
        );
    }

    #[test]
    fn test_update_keeps_id_and_status() {
        let mut repo = repo();
        let updated = repo
            .update(ProductId::new(3), input("ข้าวโพดหวานพิเศษ", "30", "12"))
            .unwrap();
        assert_eq!(updated.id, ProductId::new(3));
        assert_eq!(updated.status, ProductStatus::Inactive);
        assert_eq!(updated.stock, 12);
        assert!(repo.update(ProductId::new(42), input("x", "1", "1")).is_err());
    }

    #[test]
    fn test_create_fails_once_ids_run_out() {
        let mut products = SeedData::builtin().products;
        if let Some(last) = products.last_mut() {
            last.id = ProductId::new(u32::MAX);
        }
        let mut repo = ProductRepository::new(products).unwrap();

        let err = repo.create(input("Corn", "25", "40")).unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(repo.len(), 3);
        assert_eq!(
            repo.get(ProductId::new(u32::MAX)).unwrap().name,
            "ข้าวโพดหวาน"
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut products = SeedData::builtin().products;
        products.push(products.first().unwrap().clone());
        assert!(ProductRepository::new(products).is_err());
    }
}
