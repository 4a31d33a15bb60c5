//! South African provinces: the codes used as user-group prefixes and their display names.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Province {
    pub code: &'static str,
    pub name: &'static str,
}

pub const PROVINCES: [Province; 9] = [
    Province { code: "EC", name: "Eastern Cape" },
    Province { code: "FS", name: "Free State" },
    Province { code: "GP", name: "Gauteng" },
    Province { code: "KZN", name: "KwaZulu-Natal" },
    Province { code: "LP", name: "Limpopo" },
    Province { code: "MP", name: "Mpumalanga" },
    Province { code: "NC", name: "Northern Cape" },
    Province { code: "NW", name: "North West" },
    Province { code: "WC", name: "Western Cape" },
];

/// Case-insensitive lookup by code.
pub fn province_by_code(code: &str) -> Option<&'static Province> {
    let code = code.trim();
    PROVINCES.iter().find(|p| p.code.eq_ignore_ascii_case(code))
}

pub fn province_name(code: &str) -> Option<&'static str> {
    province_by_code(code).map(|p| p.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(province_name("wc"), Some("Western Cape"));
        assert_eq!(province_name(" KZN "), Some("KwaZulu-Natal"));
        assert_eq!(province_name("XX"), None);
    }
}
