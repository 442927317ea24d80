//! Label schema: one token domain per label position.

use super::error::ConstructionError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The set of values allowed at one label position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Domain {
    /// Enumerated tokens; a label stores the index of its token.
    Closed(Vec<String>),
    /// Any string, stored verbatim.
    Open,
}

impl Domain {
    pub fn closed<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Closed(tokens.into_iter().map(Into::into).collect())
    }
}

/// One label component.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Token {
    Int(i64),
    Str(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(index) => write!(f, "#{index}"),
            Self::Str(value) => f.write_str(value),
        }
    }
}

/// Ordered tuple of tokens attached to an edge.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(Vec<Token>);

impl Label {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self(tokens)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Graph-global label schema.
///
/// Every edge label in a graph has exactly one component per domain. A closed
/// domain component is an [`Token::Int`] index into the domain's token list;
/// an open domain component is a [`Token::Str`].
///
/// # Example
///
/// ```rust
/// use automata_engine::graph::{Domain, Schema, Token};
///
/// let schema = Schema::new(vec![Domain::closed(["left", "right"]), Domain::Open]).unwrap();
/// let label = schema.label(&["right", "weight 3"]).unwrap();
///
/// assert_eq!(label.tokens(), [Token::Int(1), Token::Str("weight 3".into())]);
/// assert_eq!(schema.names(&label).unwrap(), ["right", "weight 3"]);
/// assert!(schema.label(&["up", ""]).is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    domains: Vec<Domain>,
}

impl Schema {
    /// Validate and wrap `domains`.
    ///
    /// A closed domain must be non-empty (an empty token list is how an open
    /// domain is written) and must not repeat a token.
    pub fn new(domains: Vec<Domain>) -> Result<Self, ConstructionError> {
        for (position, domain) in domains.iter().enumerate() {
            let Domain::Closed(tokens) = domain else {
                continue;
            };
            if tokens.is_empty() {
                return Err(ConstructionError::EmptyDomain { position });
            }
            let mut seen = BTreeSet::new();
            for token in tokens {
                if !seen.insert(token.as_str()) {
                    return Err(ConstructionError::DuplicateToken {
                        position,
                        token: token.clone(),
                    });
                }
            }
        }
        Ok(Self { domains })
    }

    /// Schema of `arity` open domains.
    pub fn open(arity: usize) -> Self {
        Self {
            domains: vec![Domain::Open; arity],
        }
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn arity(&self) -> usize {
        self.domains.len()
    }

    /// Check that `label` has one well-typed component per domain.
    pub fn check(&self, label: &Label) -> Result<(), ConstructionError> {
        if label.len() != self.arity() {
            return Err(ConstructionError::Arity {
                expected: self.arity(),
                found: label.len(),
            });
        }
        for (position, (domain, token)) in self.domains.iter().zip(label.tokens()).enumerate() {
            match (domain, token) {
                (Domain::Closed(tokens), Token::Int(index)) => {
                    let in_range = usize::try_from(*index).is_ok_and(|i| i < tokens.len());
                    if !in_range {
                        return Err(ConstructionError::IndexOutOfRange {
                            position,
                            index: *index,
                            len: tokens.len(),
                        });
                    }
                }
                (Domain::Closed(_), Token::Str(_)) => {
                    return Err(ConstructionError::ExpectedIndex { position });
                }
                (Domain::Open, Token::Int(_)) => {
                    return Err(ConstructionError::ExpectedString { position });
                }
                (Domain::Open, Token::Str(_)) => {}
            }
        }
        Ok(())
    }

    /// Build a label from token names, resolving closed-domain names to indices.
    pub fn label<S: AsRef<str>>(&self, names: &[S]) -> Result<Label, ConstructionError> {
        if names.len() != self.arity() {
            return Err(ConstructionError::Arity {
                expected: self.arity(),
                found: names.len(),
            });
        }
        let tokens = self
            .domains
            .iter()
            .zip(names)
            .enumerate()
            .map(|(position, (domain, name))| {
                let name = name.as_ref();
                match domain {
                    Domain::Open => Ok(Token::Str(name.to_string())),
                    Domain::Closed(tokens) => tokens
                        .iter()
                        .position(|token| token == name)
                        .map(|index| Token::Int(index as i64))
                        .ok_or_else(|| ConstructionError::UnknownToken {
                            position,
                            token: name.to_string(),
                        }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Label::new(tokens))
    }

    /// Inverse of [`Schema::label`].
    pub fn names<'a>(&'a self, label: &'a Label) -> Result<Vec<&'a str>, ConstructionError> {
        self.check(label)?;
        Ok(self
            .domains
            .iter()
            .zip(label.tokens())
            .map(|(domain, token)| match (domain, token) {
                (Domain::Closed(tokens), Token::Int(index)) => tokens[*index as usize].as_str(),
                (_, Token::Str(value)) => value.as_str(),
                (Domain::Open, Token::Int(_)) => "",
            })
            .collect())
    }
}
