use crossterm::event::KeyCode;
use thiserror::Error;

use crate::models::{Client, ClientPayload};

#[derive(Error, Debug, PartialEq)]
pub enum FormError {
    #[error("Please fill in all required fields")]
    MissingRequired,
}

#[derive(Clone, PartialEq, Copy, Debug)]
pub enum ClientField {
    Name,
    Phone,
    Balance,
    Workplace,
}

impl ClientField {
    pub const ALL: [ClientField; 4] = [
        ClientField::Name,
        ClientField::Phone,
        ClientField::Balance,
        ClientField::Workplace,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ClientField::Name => "Name",
            ClientField::Phone => "Phone",
            ClientField::Balance => "Amount Owed",
            ClientField::Workplace => "Workplace",
        }
    }
}

/// What a valid form submits.
#[derive(Debug, PartialEq)]
pub enum Submission {
    Create(ClientPayload),
    Update(i64, ClientPayload),
}

/// The add/edit form. `id` is set while an existing client is being edited.
#[derive(Debug)]
pub struct ClientForm {
    id: Option<i64>,
    name: String,
    phone: String,
    balance: String,
    workplace: String,
    current_field: ClientField,
}

impl Default for ClientForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            phone: String::new(),
            balance: String::new(),
            workplace: String::new(),
            current_field: ClientField::Name,
        }
    }
}

impl ClientForm {
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    pub fn title(&self) -> &'static str {
        if self.is_editing() {
            "Edit Client"
        } else {
            "Add Client"
        }
    }

    pub fn current_field(&self) -> ClientField {
        self.current_field
    }

    pub fn value(&self, field: ClientField) -> &str {
        match field {
            ClientField::Name => &self.name,
            ClientField::Phone => &self.phone,
            ClientField::Balance => &self.balance,
            ClientField::Workplace => &self.workplace,
        }
    }

    /// Switch to editing `client`.
    pub fn load(&mut self, client: &Client) {
        self.id = Some(client.id);
        self.name = client.name.clone();
        self.phone = client.phone.clone();
        self.balance = client.balance.to_string();
        self.workplace = client.workplace.clone().unwrap_or_default();
        self.current_field = ClientField::Name;
    }

    /// Back to an empty Add form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            ClientField::Name => ClientField::Phone,
            ClientField::Phone => ClientField::Balance,
            ClientField::Balance => ClientField::Workplace,
            ClientField::Workplace => ClientField::Name,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            ClientField::Name => ClientField::Workplace,
            ClientField::Phone => ClientField::Name,
            ClientField::Balance => ClientField::Phone,
            ClientField::Workplace => ClientField::Balance,
        };
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        let field_value = match self.current_field {
            ClientField::Name => &mut self.name,
            ClientField::Phone => &mut self.phone,
            ClientField::Balance => &mut self.balance,
            ClientField::Workplace => &mut self.workplace,
        };

        match key {
            KeyCode::Char(c) => field_value.push(c),
            KeyCode::Backspace => {
                field_value.pop();
            }
            _ => {}
        }
    }

    /// Validate the trimmed fields and build the request to send.
    ///
    /// Name, phone and amount owed must be non-empty. The amount keeps the
    /// number it starts with (`"1500 rand"` sends 1500); one with no leading
    /// number is still accepted and sent as absent.
    pub fn submission(&self) -> Result<Submission, FormError> {
        let name = self.name.trim();
        let phone = self.phone.trim();
        let balance = self.balance.trim();
        let workplace = self.workplace.trim();

        if name.is_empty() || phone.is_empty() || balance.is_empty() {
            return Err(FormError::MissingRequired);
        }

        let payload = ClientPayload {
            name: Some(name.to_string()),
            phone: Some(phone.to_string()),
            balance: leading_number(balance),
            workplace: (!workplace.is_empty()).then(|| workplace.to_string()),
        };

        Ok(match self.id {
            Some(id) => Submission::Update(id, payload),
            None => Submission::Create(payload),
        })
    }
}

/// The longest decimal number at the start of `input`: optional sign,
/// digits with an optional fraction, then an optional exponent.
fn leading_number(input: &str) -> Option<f64> {
    let bytes = input.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = match bytes.first() {
        Some(b'+') | Some(b'-') => 1,
        _ => 0,
    };
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if frac_end > end + 1 || has_digits {
            has_digits |= frac_end > end + 1;
            end = frac_end;
        }
    }

    if !has_digits {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+') | Some(b'-')) {
            exp_start += 1;
        }
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    input[..end].parse::<f64>().ok().filter(|b| b.is_finite())
}
