//! Decoder behavior against hand-written wire XML.

#[cfg(test)]
mod tests {
    use soapstack_schema::SoapValue;
    use soapstack_xml::{DecodeError, XmlElement};

    use crate::{fixture_decoder, fixture_index};

    #[test]
    fn test_should_accumulate_out_of_order_repeated_elements() {
        let index = fixture_index();
        let decoder = fixture_decoder(&index);
        let response = index.resolve("SearchResponse").expect("SearchResponse");

        let element = XmlElement::parse(
            "<resp>\
             <result><name>Rex</name></result>\
             <total>2</total>\
             <result><name>Fido</name></result>\
             </resp>",
        )
        .expect("parse");
        let decoded = decoder.decode(response, &element).expect("decode");
        let results = decoded.as_object().expect("object")["result"]
            .as_list()
            .expect("list")
            .to_vec();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_should_memoize_repeated_fragments_independently() {
        let index = fixture_index();
        let decoder = fixture_decoder(&index);
        let animal = index.resolve("Animal").expect("Animal");

        let element = XmlElement::parse("<pet><name>Rex</name></pet>").expect("parse");
        let first = decoder.decode(animal, &element).expect("decode");
        let mut second = decoder.decode(animal, &element).expect("decode");
        assert_eq!(first, second);

        if let SoapValue::Object(fields) = &mut second {
            fields.insert("name".to_owned(), SoapValue::from("Mutt"));
        }
        let third = decoder.decode(animal, &element).expect("decode");
        assert_eq!(first, third, "mutating one copy must not leak into the cache");
    }

    #[test]
    fn test_should_reject_unknown_child_element() {
        let index = fixture_index();
        let decoder = fixture_decoder(&index);
        let animal = index.resolve("Animal").expect("Animal");

        let element =
            XmlElement::parse("<pet><name>Rex</name><wingspan>2m</wingspan></pet>").expect("parse");
        let err = decoder.decode(animal, &element).expect_err("no wingspan");
        assert!(matches!(err, DecodeError::UnrecognizedProperty { .. }));
    }

    #[test]
    fn test_should_reject_children_under_scalar_type() {
        let index = fixture_index();
        let decoder = fixture_decoder(&index);
        let int = index.resolve("int").expect("int");

        let element = XmlElement::parse("<n><digit>4</digit></n>").expect("parse");
        let err = decoder.decode(int, &element).expect_err("scalar with children");
        assert!(matches!(err, DecodeError::InvalidUsage { .. }));
    }
}
