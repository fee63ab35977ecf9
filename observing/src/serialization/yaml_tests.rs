#[cfg(test)]
mod tests {
    use crate::models::{ScriptConfiguration, Value};
    use crate::serialization::{QuoteStyle, SerializerOptions};
    use serde_json::json;

    fn config(raw: serde_json::Value) -> ScriptConfiguration {
        ScriptConfiguration::from_json(raw).unwrap()
    }

    fn assert_round_trip(config: &ScriptConfiguration, options: &SerializerOptions) {
        let text = config.render_with(options);
        let back = ScriptConfiguration::parse(&text)
            .unwrap_or_else(|e| panic!("failed to parse {:?}: {}", text, e));
        assert_eq!(&back, config, "round trip through {:?}", text);
    }

    /// The script queue example: coordinates keep their quotes
    #[test]
    fn test_coordinates_are_quoted() {
        let config = config(json!({"dec": "+01:23:45", "ra": "10:00:00"}));
        assert_eq!(config.render(), "dec: \"+01:23:45\"\nra: \"10:00:00\"\n");

        let back = ScriptConfiguration::parse(&config.render()).unwrap();
        assert_eq!(back.get("dec"), Some(&Value::String("+01:23:45".to_string())));
        assert_eq!(back.get("ra"), Some(&Value::String("10:00:00".to_string())));
    }

    /// Quoting does not depend on the digits after the sign
    #[test]
    fn test_zero_coordinate_is_quoted() {
        let config = config(json!({"dec": "+0:00:00", "alt": "-00:30:00"}));
        assert_eq!(config.render(), "dec: \"+0:00:00\"\nalt: \"-00:30:00\"\n");
        assert_round_trip(&config, &SerializerOptions::default());
    }

    #[test]
    fn test_lookalike_strings_keep_their_type() {
        let config = config(json!({
            "count": "5",
            "ratio": "1.5",
            "flag": "true",
            "answer": "no",
            "nothing": "null",
            "tilde": "~",
            "blank": "",
            "hex": "0x1F",
            "exp": "1e10",
        }));
        let text = config.render();
        assert!(text.contains("count: \"5\"\n"));
        assert!(text.contains("flag: \"true\"\n"));
        assert!(text.contains("blank: \"\"\n"));
        assert_round_trip(&config, &SerializerOptions::default());
    }

    #[test]
    fn test_real_scalars_stay_unquoted() {
        let config = config(json!({"count": 5, "ratio": 1.5, "flag": true, "nothing": null, "exptime": 30.0}));
        assert_eq!(
            config.render(),
            "count: 5\nratio: 1.5\nflag: true\nnothing: null\nexptime: 30.0\n"
        );
        assert_round_trip(&config, &SerializerOptions::default());
    }

    #[test]
    fn test_nested_layout() {
        let config = config(json!({
            "target": {"ra": "10:00:00", "frame": "icrs"},
            "filters": ["r", "i"],
            "visits": [{"band": "r", "n": 2}, {"band": "g", "n": 1}],
            "grid": [[1, 2], [3]],
            "empty_list": [],
            "empty_map": {},
        }));
        let expected = "\
target:
  ra: \"10:00:00\"
  frame: icrs
filters:
- r
- i
visits:
- band: r
  n: 2
- band: g
  n: 1
grid:
- - 1
  - 2
- - 3
empty_list: []
empty_map: {}
";
        assert_eq!(config.render(), expected);
        assert_round_trip(&config, &SerializerOptions::default());
    }

    #[test]
    fn test_sequence_inside_sequence_item_mapping() {
        let config = config(json!({"steps": [{"name": "a", "args": ["x", "y"]}]}));
        assert_eq!(config.render(), "steps:\n- name: a\n  args:\n  - x\n  - \"y\"\n");
        assert_round_trip(&config, &SerializerOptions::default());
    }

    #[test]
    fn test_keys_are_quoted_like_values() {
        let config = config(json!({"5": 1, "true": "yes", "a b": 2}));
        assert_eq!(config.render(), "\"5\": 1\n\"true\": \"yes\"\na b: 2\n");
        assert_round_trip(&config, &SerializerOptions::default());
    }

    #[test]
    fn test_single_quote_style() {
        let options = SerializerOptions {
            quote_style: QuoteStyle::Single,
            ..Default::default()
        };
        let config = config(json!({"dec": "+01:23:45", "name": "it's", "multi": "a\nb"}));
        assert_eq!(
            config.render_with(&options),
            "dec: '+01:23:45'\nname: 'it''s'\nmulti: \"a\\nb\"\n"
        );
        assert_round_trip(&config, &options);
    }

    #[test]
    fn test_flow_sequences_within_line_width() {
        let options = SerializerOptions {
            line_width: Some(30),
            ..Default::default()
        };
        let config = config(json!({
            "filters": ["r", "i", "5"],
            "long": ["aaaaaaaaaa", "bbbbbbbbbb", "cccccccccc"],
            "nested": [[1], [2]],
        }));
        assert_eq!(
            config.render_with(&options),
            "filters: [r, i, \"5\"]\nlong:\n- aaaaaaaaaa\n- bbbbbbbbbb\n- cccccccccc\nnested:\n- - 1\n- - 2\n"
        );
        assert_round_trip(&config, &options);
    }

    #[test]
    fn test_special_strings_round_trip() {
        let config = config(json!({
            "comment": "value # not a comment",
            "colon": "key: value",
            "quotes": "say \"hi\" and 'bye'",
            "backslash": "C:\\data",
            "unicode": "α Cen",
            "multiline": "first\nsecond\n",
            "tabs": "\tindented",
            "dash": "- item",
            "date": "2024-01-01",
            "spaces": "  padded  ",
            "star": "*ref",
        }));
        assert_round_trip(&config, &SerializerOptions::default());
        assert_round_trip(
            &config,
            &SerializerOptions {
                quote_style: QuoteStyle::Single,
                ..Default::default()
            },
        );
    }

    #[test]
    fn test_numbers_round_trip() {
        let config = ScriptConfiguration::build([
            ("tiny", Value::Float(1e-7)),
            ("huge", Value::Float(1e21)),
            ("negative", Value::Float(-0.5)),
            ("whole", Value::Float(2.0)),
            ("min", Value::Integer(i64::MIN)),
            ("max", Value::Integer(i64::MAX)),
        ])
        .unwrap();
        assert_round_trip(&config, &SerializerOptions::default());
    }

    #[test]
    fn test_render_never_emits_empty_mapping_marker() {
        let empty = ScriptConfiguration::empty();
        assert_eq!(empty.render(), "");
        assert_ne!(empty.render(), "{}");
        assert_ne!(empty.render(), "{}\n");
    }
}
