//! Stateless pagination state encoding into component custom IDs.
//!
//! Layout: `<prefix>_<kind> <current>_<total>[ <extra1>_<extra2>_...]`.
//! The first group identifies the paginator and control, the second carries
//! the 0-based page and page count, and the optional third carries the
//! paginator's extra values in key order.

use std::fmt;

/// Maximum length Discord accepts for a component custom ID.
pub const MAX_CUSTOM_ID_LEN: usize = 100;

const GROUP_SEPARATOR: char = ' ';
const FIELD_SEPARATOR: char = '_';

/// Which pagination control produced an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Prev,
    Next,
    JumpButton,
    JumpModal,
}

impl ControlKind {
    pub const ALL: [ControlKind; 4] = [
        ControlKind::Prev,
        ControlKind::Next,
        ControlKind::JumpButton,
        ControlKind::JumpModal,
    ];

    /// Two-letter suffix appended to the paginator prefix.
    pub fn suffix(self) -> &'static str {
        match self {
            ControlKind::Prev => "pb",
            ControlKind::Next => "nb",
            ControlKind::JumpButton => "jb",
            ControlKind::JumpModal => "jm",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.suffix() == suffix)
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControlKind::Prev => "prev_button",
            ControlKind::Next => "next_button",
            ControlKind::JumpButton => "jump_button",
            ControlKind::JumpModal => "jump_modal",
        };
        f.write_str(name)
    }
}

/// Pagination state carried round-trip through a component custom ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Current page, 0-based.
    pub current_page: usize,
    /// Total page count; zero for an empty collection.
    pub total_pages: usize,
    /// Extra values keyed by the paginator's extra keys, in key order.
    pub extra_data: ExtraData,
}

impl PaginationState {
    pub fn new(current_page: usize, total_pages: usize, extra_data: ExtraData) -> Self {
        Self {
            current_page,
            total_pages,
            extra_data,
        }
    }

    /// Whether the page counters satisfy `current < total` (or both are zero).
    pub fn is_in_range(&self) -> bool {
        if self.total_pages == 0 {
            self.current_page == 0
        } else {
            self.current_page < self.total_pages
        }
    }
}

/// Ordered key/value pairs stored alongside the page counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraData(Vec<(String, String)>);

impl ExtraData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, keeping the original position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((key, value)),
        }
    }

    /// Builder-style [`ExtraData::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reorder to match `keys`, failing if any key is missing.
    fn ordered_values<'a>(&'a self, keys: &[String]) -> Result<Vec<&'a str>, TokenError> {
        keys.iter()
            .map(|key| {
                self.get(key)
                    .ok_or_else(|| TokenError::MissingExtraValue(key.clone()))
            })
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for ExtraData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = ExtraData::new();
        for (key, value) in iter {
            data.insert(key, value);
        }
        data
    }
}

/// Parsed custom ID: the control that was used plus the carried state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationToken {
    /// Paginator prefix the identifier belongs to.
    pub prefix: String,
    pub kind: ControlKind,
    pub state: PaginationState,
}

/// Reasons a custom ID cannot be encoded or decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("invalid custom ID format: expected at least two space-separated groups")]
    MissingGroups,
    #[error("invalid pagination action in `{0}`")]
    UnknownControl(String),
    #[error("invalid pagination data format `{0}`")]
    MalformedPageData(String),
    #[error("invalid page number `{0}`")]
    InvalidNumber(String),
    #[error("page {current} is out of range for {total} pages")]
    OutOfRange { current: usize, total: usize },
    #[error("expected {expected} extra values, found {found}")]
    ExtraArity { expected: usize, found: usize },
    #[error("missing extra value for key `{0}`")]
    MissingExtraValue(String),
    #[error("extra value `{0}` contains a reserved separator")]
    ReservedCharacter(String),
    #[error("encoded custom ID is {0} characters, limit is {MAX_CUSTOM_ID_LEN}")]
    TooLong(usize),
}

/// Build the leading `<prefix>_<suffix>` group for a control.
pub fn control_id(prefix: &str, kind: ControlKind) -> String {
    format!("{prefix}{FIELD_SEPARATOR}{}", kind.suffix())
}

/// Encode pagination state into a custom ID for the given control.
pub fn encode(
    prefix: &str,
    kind: ControlKind,
    state: &PaginationState,
    extra_keys: &[String],
) -> Result<String, TokenError> {
    let values = state.extra_data.ordered_values(extra_keys)?;
    if let Some(bad) = values
        .iter()
        .find(|value| value.contains([GROUP_SEPARATOR, FIELD_SEPARATOR]))
    {
        return Err(TokenError::ReservedCharacter((*bad).to_owned()));
    }

    let mut custom_id = format!(
        "{}{GROUP_SEPARATOR}{}{FIELD_SEPARATOR}{}",
        control_id(prefix, kind),
        state.current_page,
        state.total_pages
    );

    if !extra_keys.is_empty() {
        custom_id.push(GROUP_SEPARATOR);
        custom_id.push_str(&values.join(FIELD_SEPARATOR.to_string().as_str()));
    }

    if custom_id.len() > MAX_CUSTOM_ID_LEN {
        return Err(TokenError::TooLong(custom_id.len()));
    }

    Ok(custom_id)
}

/// Decode a custom ID produced by [`encode`].
///
/// Extra values are matched positionally against `extra_keys`; a count
/// mismatch is rejected rather than partially filled.
pub fn decode(custom_id: &str, extra_keys: &[String]) -> Result<PaginationToken, TokenError> {
    let mut groups = custom_id.splitn(3, GROUP_SEPARATOR);

    let control = groups.next().unwrap_or_default();
    let Some(page_data) = groups.next() else {
        return Err(TokenError::MissingGroups);
    };
    let extra_group = groups.next();

    let (prefix, kind) = split_control(control)?;

    let mut counters = page_data.split(FIELD_SEPARATOR);
    let (Some(current_raw), Some(total_raw), None) =
        (counters.next(), counters.next(), counters.next())
    else {
        return Err(TokenError::MalformedPageData(page_data.to_owned()));
    };
    let current_page = parse_counter(current_raw)?;
    let total_pages = parse_counter(total_raw)?;

    let values: Vec<&str> = match extra_group {
        // A trailing empty group carries no values when none are expected.
        Some("") if extra_keys.is_empty() => Vec::new(),
        Some(raw) => raw.split(FIELD_SEPARATOR).collect(),
        None => Vec::new(),
    };
    if values.len() != extra_keys.len() {
        return Err(TokenError::ExtraArity {
            expected: extra_keys.len(),
            found: values.len(),
        });
    }

    let extra_data = extra_keys.iter().cloned().zip(values).collect();
    let state = PaginationState::new(current_page, total_pages, extra_data);

    if !state.is_in_range() {
        return Err(TokenError::OutOfRange {
            current: current_page,
            total: total_pages,
        });
    }

    Ok(PaginationToken {
        prefix: prefix.to_owned(),
        kind,
        state,
    })
}

/// Read the control kind from a custom ID without decoding its state.
pub fn control_kind(custom_id: &str) -> Result<ControlKind, TokenError> {
    split_control(leading_group(custom_id)).map(|(_, kind)| kind)
}

/// Read the paginator prefix from a custom ID without decoding its state.
pub fn control_prefix(custom_id: &str) -> Option<&str> {
    split_control(leading_group(custom_id))
        .ok()
        .map(|(prefix, _)| prefix)
}

fn leading_group(custom_id: &str) -> &str {
    custom_id
        .split(GROUP_SEPARATOR)
        .next()
        .unwrap_or_default()
}

fn split_control(control: &str) -> Result<(&str, ControlKind), TokenError> {
    control
        .rsplit_once(FIELD_SEPARATOR)
        .and_then(|(prefix, suffix)| {
            let kind = ControlKind::from_suffix(suffix)?;
            (!prefix.is_empty()).then_some((prefix, kind))
        })
        .ok_or_else(|| TokenError::UnknownControl(control.to_owned()))
}

fn parse_counter(raw: &str) -> Result<usize, TokenError> {
    raw.parse::<usize>()
        .map_err(|_| TokenError::InvalidNumber(raw.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_owned()).collect()
    }

    #[test]
    fn encodes_documented_layout() {
        let extra_keys = keys(&["teamNumber"]);
        let state = PaginationState::new(2, 5, ExtraData::new().with("teamNumber", "22105"));

        let custom_id = encode("awards", ControlKind::Prev, &state, &extra_keys).unwrap();

        assert_eq!(custom_id, "awards_pb 2_5 22105");
    }

    #[test]
    fn omits_extra_group_without_keys() {
        let state = PaginationState::new(0, 3, ExtraData::new());

        let custom_id = encode("demo", ControlKind::Next, &state, &[]).unwrap();

        assert_eq!(custom_id, "demo_nb 0_3");
    }

    #[test]
    fn round_trips_for_every_key_count() {
        let all_keys = ["year", "eventCode", "teamNumber", "region"];
        let all_values = ["2024", "USCALAS", "22105", "USCA"];

        for count in 0..=all_keys.len() {
            let extra_keys = keys(&all_keys[..count]);
            let extra_data: ExtraData = all_keys[..count]
                .iter()
                .zip(&all_values[..count])
                .map(|(key, value)| (*key, *value))
                .collect();
            let state = PaginationState::new(1, 4, extra_data);

            for kind in ControlKind::ALL {
                let custom_id = encode("lead", kind, &state, &extra_keys).unwrap();
                let token = decode(&custom_id, &extra_keys).unwrap();

                assert_eq!(token.prefix, "lead");
                assert_eq!(token.kind, kind);
                assert_eq!(token.state, state);
            }
        }
    }

    #[test]
    fn extra_data_is_reordered_to_key_order() {
        let extra_keys = keys(&["year", "eventCode"]);
        let state = PaginationState::new(
            0,
            1,
            ExtraData::new().with("eventCode", "USCALAS").with("year", "2024"),
        );

        let custom_id = encode("lead", ControlKind::Next, &state, &extra_keys).unwrap();

        assert_eq!(custom_id, "lead_nb 0_1 2024_USCALAS");
        let decoded = decode(&custom_id, &extra_keys).unwrap();
        assert_eq!(decoded.state.extra_data.get("year"), Some("2024"));
        assert_eq!(decoded.state.extra_data.get("eventCode"), Some("USCALAS"));
    }

    #[test]
    fn prefix_may_contain_separator() {
        let state = PaginationState::new(0, 2, ExtraData::new());

        let custom_id = encode("team_awards", ControlKind::JumpButton, &state, &[]).unwrap();
        let token = decode(&custom_id, &[]).unwrap();

        assert_eq!(token.prefix, "team_awards");
        assert_eq!(token.kind, ControlKind::JumpButton);
    }

    #[test]
    fn rejects_unknown_control_suffix() {
        assert_eq!(
            decode("xb 1_2", &[]),
            Err(TokenError::UnknownControl("xb".to_owned()))
        );
        assert!(matches!(
            decode("lead_xb 1_2", &[]),
            Err(TokenError::UnknownControl(_))
        ));
        assert!(matches!(decode("_pb 0_2", &[]), Err(TokenError::UnknownControl(_))));
    }

    #[test]
    fn rejects_missing_groups() {
        assert_eq!(decode("lead_pb", &[]), Err(TokenError::MissingGroups));
        assert_eq!(decode("", &[]), Err(TokenError::MissingGroups));
    }

    #[test]
    fn rejects_malformed_page_data() {
        assert!(matches!(
            decode("lead_nb 1", &[]),
            Err(TokenError::MalformedPageData(_))
        ));
        assert!(matches!(
            decode("lead_nb 1_2_3", &[]),
            Err(TokenError::MalformedPageData(_))
        ));
        assert_eq!(
            decode("lead_nb one_2", &[]),
            Err(TokenError::InvalidNumber("one".to_owned()))
        );
        assert_eq!(
            decode("lead_nb 1_-2", &[]),
            Err(TokenError::InvalidNumber("-2".to_owned()))
        );
    }

    #[test]
    fn rejects_out_of_range_counters() {
        assert_eq!(
            decode("lead_nb 3_3", &[]),
            Err(TokenError::OutOfRange {
                current: 3,
                total: 3
            })
        );
        assert!(decode("lead_nb 1_0", &[]).is_err());
        assert!(decode("lead_nb 0_0", &[]).is_ok());
    }

    #[test]
    fn rejects_extra_arity_mismatch() {
        let extra_keys = keys(&["year", "eventCode"]);

        assert_eq!(
            decode("lead_nb 0_2 2024", &extra_keys),
            Err(TokenError::ExtraArity {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            decode("lead_nb 0_2", &extra_keys),
            Err(TokenError::ExtraArity {
                expected: 2,
                found: 0
            })
        );
        assert!(decode("lead_nb 0_2 2024_USCALAS_extra", &extra_keys).is_err());
        assert!(decode("lead_nb 0_2 2024", &[]).is_err());
        assert!(decode("lead_nb 0_2 ", &[]).is_ok());
    }

    #[test]
    fn encode_rejects_reserved_and_missing_values() {
        let extra_keys = keys(&["eventCode"]);
        let spaced = PaginationState::new(0, 1, ExtraData::new().with("eventCode", "US CA"));
        let underscored = PaginationState::new(0, 1, ExtraData::new().with("eventCode", "US_CA"));
        let missing = PaginationState::new(0, 1, ExtraData::new());

        assert!(matches!(
            encode("lead", ControlKind::Next, &spaced, &extra_keys),
            Err(TokenError::ReservedCharacter(_))
        ));
        assert!(matches!(
            encode("lead", ControlKind::Next, &underscored, &extra_keys),
            Err(TokenError::ReservedCharacter(_))
        ));
        assert_eq!(
            encode("lead", ControlKind::Next, &missing, &extra_keys),
            Err(TokenError::MissingExtraValue("eventCode".to_owned()))
        );
    }

    #[test]
    fn encode_enforces_length_limit() {
        let extra_keys = keys(&["note"]);
        let state = PaginationState::new(0, 1, ExtraData::new().with("note", "x".repeat(90)));

        assert!(matches!(
            encode("lead", ControlKind::Next, &state, &extra_keys),
            Err(TokenError::TooLong(_))
        ));
    }

    #[test]
    fn reads_kind_and_prefix_without_full_decode() {
        assert_eq!(control_kind("lead_jm 0_4 2024_X"), Ok(ControlKind::JumpModal));
        assert_eq!(control_prefix("team_awards_nb garbage"), Some("team_awards"));
        assert_eq!(control_prefix("terminate:confirm:1:2:0"), None);
    }

    #[test]
    fn control_kind_displays_readable_name() {
        assert_eq!(ControlKind::Prev.to_string(), "prev_button");
        assert_eq!(ControlKind::JumpModal.to_string(), "jump_modal");
    }
}
