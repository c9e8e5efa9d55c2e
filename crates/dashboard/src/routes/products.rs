//! Product catalog route handlers.
//!
//! Create and edit forms are multipart so an image can be uploaded instead of
//! linked. Every submission is validated into a typed product before the
//! catalog is touched; a rejected form is shown again with its values and a
//! 422 status.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use farm2hand_core::ProductId;
use farm2hand_core::product::{
    ImageError, NewProduct, Product, ProductForm, ProductImage, ProductValidationError,
    UNIT_OPTIONS,
};
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::routes::{ConfirmForm, NoticeQuery, ShellView, Tab, redirect_with_notice};
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub unit: String,
    pub stock: u32,
    pub image: String,
    pub active: bool,
    pub out_of_stock: bool,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub toggle_label: &'static str,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let active = product.status.is_active();
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price.display(),
            unit: product.unit.clone(),
            stock: product.stock,
            image: product.image.as_str().to_string(),
            active,
            out_of_stock: product.is_out_of_stock(),
            status_label: product.status.label(),
            status_class: product.status.as_str(),
            toggle_label: if active { "Pause" } else { "Resume" },
        }
    }
}

/// Unit dropdown entry.
#[derive(Clone)]
pub struct UnitOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Dropdown entries with `selected` marked; an unlisted unit is offered first.
fn unit_options(selected: &str) -> Vec<UnitOption> {
    let selected = match selected.trim() {
        "" => farm2hand_core::product::DEFAULT_UNIT,
        unit => unit,
    };
    let mut options: Vec<UnitOption> = UNIT_OPTIONS
        .iter()
        .map(|(value, label)| UnitOption {
            value: (*value).to_string(),
            label: (*label).to_string(),
            selected: *value == selected,
        })
        .collect();
    if !options.iter().any(|o| o.selected) {
        options.insert(
            0,
            UnitOption {
                value: selected.to_string(),
                label: selected.to_string(),
                selected: true,
            },
        );
    }
    options
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub shell: ShellView,
    pub products: Vec<ProductView>,
    pub notice: Option<String>,
}

/// Create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub shell: ShellView,
    pub heading: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub form: ProductForm,
    pub units: Vec<UnitOption>,
    pub preview: Option<String>,
    pub error: Option<String>,
}

/// Delete confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "products/delete.html")]
pub struct DeleteConfirmTemplate {
    pub shell: ShellView,
    pub product: ProductView,
}

impl ProductFormTemplate {
    fn create(state: &AppState, form: ProductForm, error: Option<String>) -> Self {
        Self {
            shell: ShellView::new(state, Tab::Products),
            heading: "Add product",
            action: "/products".to_string(),
            submit_label: "Add product",
            units: unit_options(&form.unit),
            form,
            preview: None,
            error,
        }
    }

    fn edit(state: &AppState, product: &Product, form: ProductForm, error: Option<String>) -> Self {
        Self {
            shell: ShellView::new(state, Tab::Products),
            heading: "Edit product",
            action: format!("/products/{}", product.id),
            submit_label: "Save changes",
            units: unit_options(&form.unit),
            form,
            preview: Some(product.image.as_str().to_string()),
            error,
        }
    }
}

/// Product form as submitted, plus the encoded upload if a file was chosen.
struct Submission {
    form: ProductForm,
    upload: Option<Result<ProductImage, ImageError>>,
}

impl Submission {
    /// Read every known field from a multipart body.
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = ProductForm::default();
        let mut upload = None;

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "image_file" => {
                    let content_type = field.content_type().unwrap_or_default().to_string();
                    let bytes = field.bytes().await?;
                    // An empty file input still submits a part.
                    if !bytes.is_empty() {
                        upload = Some(ProductImage::from_upload(&bytes, &content_type));
                    }
                }
                "name" => form.name = field.text().await?,
                "price" => form.price = field.text().await?,
                "unit" => form.unit = field.text().await?,
                "stock" => form.stock = field.text().await?,
                "image_url" => form.image_url = field.text().await?,
                _ => {}
            }
        }

        Ok(Self { form, upload })
    }

    fn validate(&self) -> Result<NewProduct, ProductValidationError> {
        let upload = self.upload.clone().transpose()?;
        self.form.validate(upload)
    }
}

fn rejected(template: ProductFormTemplate) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, template).into_response()
}

/// Display the catalog.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<NoticeQuery>,
) -> impl IntoResponse {
    let products: Vec<ProductView> = state
        .store()
        .products()
        .await
        .list()
        .map(ProductView::from)
        .collect();

    ProductsIndexTemplate {
        shell: ShellView::new(&state, Tab::Products),
        products,
        notice: query.notice,
    }
}

/// Display the empty create form.
#[instrument(skip(state))]
pub async fn new_form(State(state): State<AppState>) -> impl IntoResponse {
    ProductFormTemplate::create(&state, ProductForm::default(), None)
}

/// Add a product.
#[instrument(skip(state, multipart))]
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let submission = Submission::read(multipart).await?;

    let input = match submission.validate() {
        Ok(input) => input,
        Err(err) => {
            tracing::debug!(error = %err, "Product form rejected");
            return Ok(rejected(ProductFormTemplate::create(
                &state,
                submission.form,
                Some(err.to_string()),
            )));
        }
    };

    let mut products = state.store().products_mut().await;
    let product = products.create(input)?;
    tracing::info!(product_id = %product.id, name = %product.name, "Product created");

    Ok(redirect_with_notice("/products", "Product added").into_response())
}

/// Display the edit form for one product.
#[instrument(skip(state))]
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse, AppError> {
    let products = state.store().products().await;
    let product = products
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ProductFormTemplate::edit(
        &state,
        product,
        ProductForm::from_product(product),
        None,
    ))
}

/// Save an edited product.
#[instrument(skip(state, multipart))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let submission = Submission::read(multipart).await?;
    let mut products = state.store().products_mut().await;

    let Some(current) = products.get(id) else {
        return Err(AppError::NotFound(format!("product {id}")));
    };

    let input = match submission.validate() {
        Ok(input) => input,
        Err(err) => {
            tracing::debug!(product_id = %id, error = %err, "Product form rejected");
            return Ok(rejected(ProductFormTemplate::edit(
                &state,
                current,
                submission.form,
                Some(err.to_string()),
            )));
        }
    };

    let product = products.update(id, input)?;
    tracing::info!(product_id = %product.id, name = %product.name, "Product updated");

    Ok(redirect_with_notice("/products", "Product saved").into_response())
}

/// Flip a product between on sale and paused.
#[instrument(skip(state))]
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Redirect, AppError> {
    let status = state.store().products_mut().await.toggle_status(id)?;
    tracing::info!(product_id = %id, status = %status, "Product status toggled");
    Ok(Redirect::to("/products"))
}

/// Ask before deleting.
#[instrument(skip(state))]
pub async fn delete_confirm(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse, AppError> {
    let product = state
        .store()
        .products()
        .await
        .get(id)
        .map(ProductView::from)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(DeleteConfirmTemplate {
        shell: ShellView::new(&state, Tab::Products),
        product,
    })
}

/// Delete a product once confirmed; otherwise ask again.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Form(form): Form<ConfirmForm>,
) -> Result<Redirect, AppError> {
    if !form.is_confirmed() {
        return Ok(Redirect::to(&format!("/products/{id}/delete")));
    }

    let removed = state.store().products_mut().await.delete(id)?;
    tracing::info!(product_id = %id, name = %removed.name, "Product deleted");
    Ok(redirect_with_notice("/products", "Product deleted"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use farm2hand_core::ProductStatus;

    use super::*;
    use crate::testing::{TestApp, multipart_body};

    #[tokio::test]
    async fn test_index_lists_seeded_products() {
        let app = TestApp::new();
        let response = app.get("/products").await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.contains("มะเขือเทศสด"));
        assert!(response.body.contains("฿45"));
        assert!(response.body.contains("Paused"));
    }

    #[tokio::test]
    async fn test_create_corn() {
        let app = TestApp::new();
        let (content_type, body) =
            multipart_body(&[("name", "Corn"), ("price", "25"), ("stock", "40"), ("unit", "")]);
        let response = app.post("/products", &content_type, body).await;

        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert_eq!(response.location(), "/products?notice=Product+added");

        let products = app.state.store().products().await;
        assert_eq!(products.len(), 4);
        let corn = products.list().last().unwrap();
        assert_eq!(corn.name, "Corn");
        assert_eq!(corn.stock, 40);
        assert_eq!(corn.status, ProductStatus::Active);
    }

    #[tokio::test]
    async fn test_create_rejects_incomplete_form() {
        let app = TestApp::new();
        let (content_type, body) =
            multipart_body(&[("name", "Corn"), ("price", "abc"), ("stock", "40")]);
        let response = app.post("/products", &content_type, body).await;

        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.body.contains("Please complete all fields"));
        // The submitted values are shown again.
        assert!(response.body.contains("value=\"Corn\""));
        assert_eq!(app.state.store().products().await.len(), 3);
    }

    #[tokio::test]
    async fn test_create_with_uploaded_image() {
        let app = TestApp::new();
        let boundary = "farm2hand-test-boundary";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nLime\r\n\
             --{boundary}\r\nContent-Disposition: form-data; name=\"price\"\r\n\r\n3\r\n\
             --{boundary}\r\nContent-Disposition: form-data; name=\"stock\"\r\n\r\n100\r\n\
             --{boundary}\r\nContent-Disposition: form-data; name=\"image_file\"; filename=\"lime.png\"\r\n\
             Content-Type: image/png\r\n\r\nPNGDATA\r\n--{boundary}--\r\n"
        );
        let content_type = format!("multipart/form-data; boundary={boundary}");
        let response = app.post("/products", &content_type, body).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);

        let products = app.state.store().products().await;
        let lime = products.list().last().unwrap();
        assert_eq!(lime.image.as_str(), "data:image/png;base64,UE5HREFUQQ==");
    }

    #[tokio::test]
    async fn test_edit_form_prefills_values() {
        let app = TestApp::new();
        let response = app.get("/products/2/edit").await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.contains("value=\"แตงกวาญี่ปุ่น\""));
        assert!(response.body.contains("value=\"35\""));

        assert_eq!(app.get("/products/99/edit").await.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_keeps_status() {
        let app = TestApp::new();
        let (content_type, body) = multipart_body(&[
            ("name", "ข้าวโพดหวาน"),
            ("price", "28"),
            ("stock", "15"),
            ("unit", "ฝัก"),
        ]);
        let response = app.post("/products/3", &content_type, body).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);

        let products = app.state.store().products().await;
        let corn = products.get(ProductId::new(3)).unwrap();
        assert_eq!(corn.stock, 15);
        assert_eq!(corn.unit, "ฝัก");
        assert_eq!(corn.status, ProductStatus::Inactive);
    }

    #[tokio::test]
    async fn test_update_rejects_incomplete_form() {
        let app = TestApp::new();
        let before = app
            .state
            .store()
            .products()
            .await
            .get(ProductId::new(2))
            .unwrap()
            .clone();

        let (content_type, body) = multipart_body(&[
            ("name", "แตงกวาญี่ปุ่น"),
            ("price", "abc"),
            ("stock", "99"),
        ]);
        let response = app.post("/products/2", &content_type, body).await;
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.body.contains("Please complete all fields"));
        assert!(response.body.contains("value=\"abc\""));

        let products = app.state.store().products().await;
        assert_eq!(products.get(ProductId::new(2)).unwrap(), &before);
    }

    #[tokio::test]
    async fn test_create_rejects_price_above_ceiling() {
        let app = TestApp::new();
        let (content_type, body) = multipart_body(&[
            ("name", "Corn"),
            ("price", "79228162514264337593543950335"),
            ("stock", "5"),
        ]);
        let response = app.post("/products", &content_type, body).await;
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.body.contains("Please complete all fields"));
        assert_eq!(app.state.store().products().await.len(), 3);
    }

    #[tokio::test]
    async fn test_toggle_flips_status() {
        let app = TestApp::new();
        let response = app.post_form("/products/1/toggle", "").await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        let status = app.state.store().products().await.get(ProductId::new(1)).unwrap().status;
        assert_eq!(status, ProductStatus::Inactive);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let app = TestApp::new();

        let response = app.get("/products/2/delete").await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.contains("แตงกวาญี่ปุ่น"));

        let response = app.post_form("/products/2/delete", "").await;
        assert_eq!(response.location(), "/products/2/delete");
        assert_eq!(app.state.store().products().await.len(), 3);

        let response = app.post_form("/products/2/delete", "confirm=yes").await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        let products = app.state.store().products().await;
        let ids: Vec<u32> = products.list().map(|p| p.id.as_u32()).collect();
        assert_eq!(ids, [1, 3]);
    }

    #[test]
    fn test_unit_options_include_custom_unit() {
        let options = unit_options("ฝัก");
        assert_eq!(options.first().unwrap().value, "ฝัก");
        assert_eq!(options.iter().filter(|o| o.selected).count(), 1);

        let options = unit_options("");
        assert!(options.first().unwrap().selected);
        assert_eq!(options.len(), UNIT_OPTIONS.len());
    }
}
