//! Node payloads of a persisted automaton graph.

use crate::codec::{CodecError, FieldReader, FieldWriter, FormatError, Payload};
use crate::core::Position;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

const AUTOMATON_TAG: i64 = 0;
const STATE_TAG: i64 = 1;

/// Payload of one node in an automaton graph.
///
/// The root node names the variant; every other node is a state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeRecord {
    Automaton {
        variant: String,
    },
    State {
        name: String,
        position: Position,
        accepting: bool,
    },
}

impl Payload for NodeRecord {
    fn write_fields<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<(), CodecError> {
        match self {
            Self::Automaton { variant } => {
                out.write_int(AUTOMATON_TAG)?;
                out.write_str(variant)
            }
            Self::State {
                name,
                position,
                accepting,
            } => {
                out.write_int(STATE_TAG)?;
                out.write_str(name)?;
                out.write_f64(position.x)?;
                out.write_f64(position.y)?;
                out.write_bool(*accepting)
            }
        }
    }

    fn read_fields<R: Read>(input: &mut FieldReader<R>) -> Result<Self, CodecError> {
        match input.read_int()? {
            AUTOMATON_TAG => Ok(Self::Automaton {
                variant: input.read_str()?,
            }),
            STATE_TAG => Ok(Self::State {
                name: input.read_str()?,
                position: Position::new(input.read_f64()?, input.read_f64()?),
                accepting: input.read_bool()?,
            }),
            tag => Err(FormatError::Payload(format!("unknown node record tag {tag}")).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodeLimits;

    #[test]
    fn state_record_fields_are_ordered() {
        let record = NodeRecord::State {
            name: "q".to_string(),
            position: Position::new(1.0, -2.0),
            accepting: true,
        };
        let mut bytes = Vec::new();
        record.write_fields(&mut FieldWriter::new(&mut bytes)).unwrap();

        let mut input = FieldReader::new(&bytes[..], DecodeLimits::default());
        assert_eq!(NodeRecord::read_fields(&mut input).unwrap(), record);
        assert_eq!(input.offset(), bytes.len() as u64);
    }

    #[test]
    fn unknown_tag_is_a_payload_error() {
        let mut input = FieldReader::new(&[1u8, 7][..], DecodeLimits::default());
        assert!(matches!(
            NodeRecord::read_fields(&mut input),
            Err(CodecError::Format(FormatError::Payload(_)))
        ));
    }

    #[test]
    fn text_form_is_tagged() {
        let record = NodeRecord::Automaton {
            variant: "dfa".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"kind":"automaton","variant":"dfa"}"#
        );
    }
}
