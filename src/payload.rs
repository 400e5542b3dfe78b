/// Namespace of the Cisco IOS-XE native configuration model
const IOS_XE_NATIVE_NS: &str = "http://cisco.com/ns/yang/Cisco-IOS-XE-native";

/// A single loopback interface definition, rendered as the `<config>`
/// document that edit-config expects. Rendering is pure: identical inputs
/// produce identical bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopbackConfig {
    pub number: u8,
    pub second_octet: u8,
    pub description: String,
}

impl LoopbackConfig {
    pub fn new(number: u8, second_octet: u8, description: &str) -> Self {
        Self {
            number,
            second_octet,
            description: description.to_string(),
        }
    }

    pub fn to_xml(&self) -> String {
        format!(
            "<config>\n  \
             <native xmlns=\"{ns}\">\n    \
             <interface>\n      \
             <Loopback>\n        \
             <name>{num}</name>\n        \
             <description>Loopback{num} - {desc}</description>\n        \
             <ip>\n          \
             <address>\n            \
             <primary>\n              \
             <address>10.{octet}.{num}.1</address>\n              \
             <mask>255.255.255.255</mask>\n            \
             </primary>\n          \
             </address>\n        \
             </ip>\n      \
             </Loopback>\n    \
             </interface>\n  \
             </native>\n\
             </config>",
            ns = IOS_XE_NATIVE_NS,
            num = self.number,
            octet = self.second_octet,
            desc = xml_escape(&self.description),
        )
    }
}

/// Fixed vendor save operation: persist the running configuration to startup.
/// No parameters; dispatched as-is inside an rpc envelope.
pub fn save_config_rpc() -> String {
    "<cisco-ia:save-config xmlns:cisco-ia=\"http://cisco.com/yang/cisco-ia\"/>".to_string()
}

/// Minimal escaping for operator-supplied text embedded in the document
pub fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback_document_golden() {
        let xml = LoopbackConfig::new(5, 111, "test").to_xml();
        let expected = "<config>\n  \
             <native xmlns=\"http://cisco.com/ns/yang/Cisco-IOS-XE-native\">\n    \
             <interface>\n      \
             <Loopback>\n        \
             <name>5</name>\n        \
             <description>Loopback5 - test</description>\n        \
             <ip>\n          \
             <address>\n            \
             <primary>\n              \
             <address>10.111.5.1</address>\n              \
             <mask>255.255.255.255</mask>\n            \
             </primary>\n          \
             </address>\n        \
             </ip>\n      \
             </Loopback>\n    \
             </interface>\n  \
             </native>\n\
             </config>";
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let a = LoopbackConfig::new(20, 254, "uplink loopbacks").to_xml();
        let b = LoopbackConfig::new(20, 254, "uplink loopbacks").to_xml();
        assert_eq!(a, b);
    }

    #[test]
    fn test_address_uses_sequence_and_octet() {
        let xml = LoopbackConfig::new(255, 0, "edge").to_xml();
        assert!(xml.contains("<address>10.0.255.1</address>"));
        assert!(xml.contains("<mask>255.255.255.255</mask>"));
        assert!(xml.contains("<name>255</name>"));
    }

    #[test]
    fn test_description_is_escaped() {
        let xml = LoopbackConfig::new(1, 1, "lab <a> & \"b\"").to_xml();
        assert!(xml.contains("Loopback1 - lab &lt;a&gt; &amp; &quot;b&quot;"));
        assert!(!xml.contains("<a>"));
    }

    #[test]
    fn test_save_rpc_is_parameterless() {
        let rpc = save_config_rpc();
        assert!(rpc.contains("http://cisco.com/yang/cisco-ia"));
        assert!(rpc.ends_with("/>"));
    }
}
