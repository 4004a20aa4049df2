use std::ops::RangeInclusive;

pub const MARKS_RANGE: RangeInclusive<i64> = 0..=100;
pub const MARKS_FIELD: &str = "marks";
pub const MARKS_RANGE_MESSAGE: &str = "Marks must be between 0 and 100";
pub const FORM_ERROR_MESSAGE: &str = "Please correct the errors in the form";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldState {
    #[default]
    Untouched,
    Valid,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Password,
    Number,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
    pub state: FieldState,
}

impl FormField {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind, required: false, value: String::new(), state: FieldState::Untouched }
    }

    pub fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { required: true, ..Self::new(name, label, kind) }
    }

    fn is_marks(&self) -> bool {
        self.kind == FieldKind::Number && self.name == MARKS_FIELD
    }

    /// Submit-time rule. Returns whether the field passed.
    pub fn check(&mut self) -> bool {
        if !self.required {
            return true;
        }

        let mut ok = !self.value.trim().is_empty();
        self.state = if ok { FieldState::Valid } else { FieldState::Invalid };

        if self.is_marks() && parse_marks(&self.value).is_none() {
            self.state = FieldState::Invalid;
            ok = false;
        }

        ok
    }

    /// Live rule applied on every edit of a required field.
    pub fn on_input(&mut self) {
        if !self.required {
            return;
        }

        self.state = if self.is_marks() {
            match parse_marks(&self.value) {
                Some(_) => FieldState::Valid,
                None => FieldState::Invalid,
            }
        } else if self.value.trim().is_empty() {
            FieldState::Invalid
        } else {
            FieldState::Valid
        };
    }

    pub fn reset(&mut self) {
        self.value.clear();
        self.state = FieldState::Untouched;
    }
}

#[derive(Debug, Clone, Default)]
pub struct Form {
    fields: Vec<FormField>,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    /// Checks every field, marking each one, and reports whether all passed.
    pub fn validate(&mut self) -> bool {
        self.fields.iter_mut().fold(true, |all_ok, field| field.check() && all_ok)
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut [FormField] {
        &mut self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    pub fn value(&self, name: &str) -> &str {
        self.field(name).map(|f| f.value.as_str()).unwrap_or_default()
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        if let Some(field) = self.field_mut(name) {
            field.value = value.into();
        }
    }

    pub fn reset(&mut self) {
        self.fields.iter_mut().for_each(FormField::reset);
    }
}

/// Leading-integer parse: whitespace is trimmed, an optional sign is
/// accepted and digits are read up to the first non-digit.
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let s = input.trim();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Marks as entered by the user, accepted only inside `MARKS_RANGE`.
pub fn parse_marks(input: &str) -> Option<u8> {
    parse_leading_int(input)
        .filter(|marks| MARKS_RANGE.contains(marks))
        .and_then(|marks| u8::try_from(marks).ok())
}
