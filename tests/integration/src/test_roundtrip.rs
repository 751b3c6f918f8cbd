//! Round-trip tests: encode, re-parse, decode, compare.

#[cfg(test)]
mod tests {
    use soapstack_schema::SoapValue;
    use soapstack_xml::XmlElement;

    use crate::{fixture_decoder, fixture_encoder, fixture_index, object};

    #[test]
    fn test_should_round_trip_primitive_values() {
        let index = fixture_index();
        let encoder = fixture_encoder(&index);
        let decoder = fixture_decoder(&index);

        let cases = [
            ("string", SoapValue::from("a <tricky> & 'quoted' \"text\"")),
            ("int", SoapValue::from(-17i64)),
            ("long", SoapValue::from(4_000_000_000i64)),
            ("double", SoapValue::from(2.5f64)),
            ("boolean", SoapValue::from(true)),
        ];
        for (type_name, value) in cases {
            let ty = index.resolve(type_name).expect("type");
            let xml = encoder.encode_tagged("v", ty, &value).expect("encode");
            let element = XmlElement::parse(&xml).expect("parse");
            let decoded = decoder.decode(ty, &element).expect("decode");
            assert_eq!(decoded, value, "round-trip of {type_name}");
        }
    }

    #[test]
    fn test_should_round_trip_object_with_declared_order() {
        let index = fixture_index();
        let encoder = fixture_encoder(&index);
        let decoder = fixture_decoder(&index);
        let dog = index.resolve("Dog").expect("Dog");

        // Keys reversed relative to declaration order on purpose.
        let value = object(&[
            ("breed", SoapValue::from("corgi")),
            ("name", SoapValue::from("Rex")),
        ]);
        let xml = encoder.encode(dog, &value).expect("encode");
        assert_eq!(xml, "<name>Rex</name><breed>corgi</breed>");

        let element = XmlElement::parse(&format!("<pet>{xml}</pet>")).expect("parse");
        let decoded = decoder.decode(dog, &element).expect("decode");
        let fields = decoded.as_object().expect("object");
        assert_eq!(fields["name"], SoapValue::String("Rex".to_owned()));
        assert_eq!(fields["breed"], SoapValue::String("corgi".to_owned()));
    }

    #[test]
    fn test_should_round_trip_empty_array_to_empty_sequence() {
        let index = fixture_index();
        let encoder = fixture_encoder(&index);
        let decoder = fixture_decoder(&index);
        let animal = index.resolve("Animal").expect("Animal");

        let value = object(&[
            ("name", SoapValue::from("Rex")),
            ("tags", SoapValue::List(vec![])),
        ]);
        let xml = encoder.encode(animal, &value).expect("encode");
        // Zero entries emit zero tags.
        assert_eq!(xml, "<name>Rex</name>");

        let element = XmlElement::parse(&format!("<pet>{xml}<tags/></pet>")).expect("parse");
        let decoded = decoder.decode(animal, &element).expect("decode");
        assert_eq!(
            decoded.as_object().expect("object")["tags"],
            SoapValue::List(vec![])
        );
    }

    #[test]
    fn test_should_round_trip_nested_arrays_of_objects() {
        let index = fixture_index();
        let encoder = fixture_encoder(&index);
        let decoder = fixture_decoder(&index);
        let response = index.resolve("SearchResponse").expect("SearchResponse");

        let value = object(&[
            (
                "result",
                SoapValue::List(vec![
                    object(&[("name", SoapValue::from("Rex"))]),
                    object(&[
                        ("name", SoapValue::from("Fido")),
                        ("breed", SoapValue::from("beagle")),
                    ]),
                ]),
            ),
            ("total", SoapValue::from(2i64)),
            ("status", SoapValue::from("active")),
        ]);

        let xml = encoder.encode(response, &value).expect("encode");
        let element = XmlElement::parse(&format!("<resp>{xml}</resp>")).expect("parse");
        let decoded = decoder.decode(response, &element).expect("decode");

        let fields = decoded.as_object().expect("object");
        assert_eq!(fields["total"], SoapValue::Int(2));
        assert_eq!(fields["status"], SoapValue::String("active".to_owned()));
        let results = fields["result"].as_list().expect("list");
        assert_eq!(results.len(), 2);
        assert_eq!(
            results[1].as_object().expect("object")["breed"],
            SoapValue::String("beagle".to_owned())
        );
    }
}
