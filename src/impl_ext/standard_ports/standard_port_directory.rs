use crate::entities::PortDirectory;

/// Keyword lookup of a ship's home port. The first rule whose keyword
/// appears in the (lowercased) ship name wins.
pub struct StandardPortDirectory {
    rules: Vec<(String, String)>,
}

impl StandardPortDirectory {
    /// A directory without any rules; every lookup misses.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_port(mut self, ship_keyword: &str, port: &str) -> Self {
        self.rules
            .push((ship_keyword.trim().to_lowercase(), port.to_string()));
        self
    }
}

impl Default for StandardPortDirectory {
    fn default() -> Self {
        Self::empty()
            .with_port("navigator", "Los Angeles (San Pedro), CA")
            .with_port("mariner", "Port Canaveral, FL")
            .with_port("wonder", "Port Canaveral, FL")
            .with_port("utopia", "Port Canaveral, FL")
            .with_port("harmony", "Galveston, TX")
            .with_port("symphony", "Miami, FL")
            .with_port("oasis", "Miami, FL")
            .with_port("quantum", "Singapore")
            .with_port("ovation", "Seattle, WA")
    }
}

impl PortDirectory for StandardPortDirectory {
    fn home_port(&self, ship: &str) -> Option<String> {
        let ship = ship.to_lowercase();
        self.rules
            .iter()
            .find(|(keyword, _)| !keyword.is_empty() && ship.contains(keyword.as_str()))
            .map(|(_, port)| port.clone())
    }
}
