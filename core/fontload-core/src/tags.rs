//! Serde adapter writing tag lists as strings (made by FontLab https://www.fontlab.com/)
//!
//! Used as `#[serde(with = "crate::tags")]` on `Vec<Tag>` fields.

use read_fonts::types::Tag;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

pub(crate) fn serialize<S: Serializer>(tags: &[Tag], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(tags.iter().map(Tag::to_string))
}

pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Tag>, D::Error> {
    Vec::<String>::deserialize(deserializer)?
        .iter()
        .map(|text| {
            text.parse::<Tag>()
                .map_err(|err| D::Error::custom(format!("invalid tag {text:?}: {err}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use read_fonts::types::Tag;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Tagged {
        #[serde(with = "crate::tags")]
        tags: Vec<Tag>,
    }

    #[test]
    fn short_tags_keep_their_padding() {
        let tagged = Tagged {
            tags: vec![Tag::new(b"cv1 "), Tag::new(b"wght")],
        };

        let json = serde_json::to_string(&tagged).expect("serialize");
        assert_eq!(json, r#"{"tags":["cv1 ","wght"]}"#);

        let back: Tagged = serde_json::from_str(r#"{"tags":["cv1","wght"]}"#).expect("parse");
        assert_eq!(back, tagged);
    }

    #[test]
    fn malformed_tags_are_rejected() {
        for bad in [r#"{"tags":[""]}"#, r#"{"tags":["wghtx"]}"#, r#"{"tags":[" ab"]}"#] {
            let err = serde_json::from_str::<Tagged>(bad).expect_err(bad);
            assert!(err.to_string().contains("invalid tag"), "{err}");
        }
    }
}
