//! Chat route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use farm2hand_core::ContactId;
use farm2hand_core::chat::{ChatContact, ChatMessage, OutgoingMessage};
use serde::Deserialize;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::routes::{ShellView, Tab};
use crate::state::AppState;

/// Contact search query string.
#[derive(Debug, Default, Deserialize)]
pub struct ChatQuery {
    #[serde(default)]
    pub q: String,
}

/// Send message form data.
#[derive(Debug, Deserialize)]
pub struct SendForm {
    #[serde(default)]
    pub message: String,
}

/// Contact display data for templates.
#[derive(Clone)]
pub struct ContactView {
    pub id: ContactId,
    pub name: String,
    pub avatar: String,
    pub last_message: String,
    pub last_message_time: String,
    pub unread: u32,
    pub online: bool,
    pub selected: bool,
}

impl ContactView {
    fn new(contact: &ChatContact, selected: ContactId) -> Self {
        Self {
            id: contact.id,
            name: contact.name.clone(),
            avatar: contact.avatar.clone(),
            last_message: contact.last_message.clone(),
            last_message_time: contact.last_message_time.clone(),
            unread: contact.unread,
            online: contact.online,
            selected: contact.id == selected,
        }
    }
}

/// Message display data for templates.
#[derive(Clone)]
pub struct MessageView {
    pub sender: String,
    pub body: String,
    pub clock: String,
    pub is_me: bool,
}

impl From<&ChatMessage> for MessageView {
    fn from(message: &ChatMessage) -> Self {
        Self {
            sender: message.sender.clone(),
            body: message.body.clone(),
            clock: message.clock(),
            is_me: message.is_me,
        }
    }
}

/// Chat page template.
#[derive(Template, WebTemplate)]
#[template(path = "chat/index.html")]
pub struct ChatTemplate {
    pub shell: ShellView,
    pub query: String,
    pub contacts: Vec<ContactView>,
    pub selected: Option<ContactView>,
    pub messages: Vec<MessageView>,
}

/// Open the first conversation, or show the empty page when there are no
/// contacts.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Response {
    let first = state.store().chat().await.first_contact_id();
    match first {
        Some(id) => Redirect::to(&format!("/chat/{id}")).into_response(),
        None => ChatTemplate {
            shell: ShellView::new(&state, Tab::Chat),
            query: String::new(),
            contacts: Vec::new(),
            selected: None,
            messages: Vec::new(),
        }
        .into_response(),
    }
}

/// Show one conversation, marking it read.
///
/// This is the one GET that writes: opening a conversation is what reads
/// it. Repeating the request changes nothing further.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ContactId>,
    Query(query): Query<ChatQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut chat = state.store().chat_mut().await;
    let selected = ContactView::new(chat.open(id)?, id);

    let contacts = chat
        .contacts(&query.q)
        .into_iter()
        .map(|c| ContactView::new(c, id))
        .collect();
    let messages = chat.thread(id).iter().map(MessageView::from).collect();

    Ok(ChatTemplate {
        shell: ShellView::new(&state, Tab::Chat),
        query: query.q,
        contacts,
        selected: Some(selected),
        messages,
    })
}

/// Append a message from the seller; blank drafts are ignored.
#[instrument(skip(state, form))]
pub async fn send(
    State(state): State<AppState>,
    Path(id): Path<ContactId>,
    Form(form): Form<SendForm>,
) -> Result<Redirect, AppError> {
    let mut chat = state.store().chat_mut().await;
    if chat.contact(id).is_none() {
        return Err(AppError::NotFound(format!("contact {id}")));
    }

    if let Some(draft) = OutgoingMessage::parse(&form.message) {
        let now = chrono::Local::now().naive_local();
        let message = chat.send(id, draft, now)?;
        tracing::info!(contact_id = %id, message_id = %message.id, "Chat message sent");
    }

    Ok(Redirect::to(&format!("/chat/{id}#latest")))
}
