//! Fault-envelope detection on response decoding.

#[cfg(test)]
mod tests {
    use soapstack_xml::{DecodeError, XmlElement};

    use crate::{fixture_decoder, fixture_index};

    #[test]
    fn test_should_raise_server_fault_instead_of_normal_value() {
        let index = fixture_index();
        let decoder = fixture_decoder(&index);
        let response = index.resolve("SearchResponse").expect("SearchResponse");

        let root = XmlElement::parse(
            "<Body><Fault>\
             <faultcode>Server.Backend</faultcode>\
             <faultstring>index unavailable</faultstring>\
             </Fault></Body>",
        )
        .expect("parse");

        let err = decoder.decode_response(response, &root).expect_err("fault");
        let DecodeError::ServerFault(fault) = err else {
            panic!("expected ServerFault, got {err:?}");
        };
        assert_eq!(fault.code.as_deref(), Some("Server.Backend"));
        assert_eq!(fault.message.as_deref(), Some("index unavailable"));
        assert!(fault.detail.as_object().is_some());
    }

    #[test]
    fn test_should_recognize_namespaced_fault_tag() {
        let index = fixture_index();
        let decoder = fixture_decoder(&index);
        let response = index.resolve("SearchResponse").expect("SearchResponse");

        // Prefixes are stripped at parse time, so soapenv:Fault matches.
        let root = XmlElement::parse(
            "<soapenv:Body><soapenv:Fault>\
             <faultcode>Client</faultcode>\
             <faultstring>bad request</faultstring>\
             </soapenv:Fault></soapenv:Body>",
        )
        .expect("parse");

        assert!(matches!(
            decoder.decode_response(response, &root),
            Err(DecodeError::ServerFault(_))
        ));
    }

    #[test]
    fn test_should_decode_normal_body_when_no_fault_present() {
        let index = fixture_index();
        let decoder = fixture_decoder(&index);
        let response = index.resolve("SearchResponse").expect("SearchResponse");

        let root = XmlElement::parse("<resp><total>0</total></resp>").expect("parse");
        let value = decoder.decode_response(response, &root).expect("decode");
        assert!(value.as_object().is_some());
    }
}
