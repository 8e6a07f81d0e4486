/// Tag selection for the public post list. `None` means unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    selected: Option<String>,
}

impl TagFilter {
    /// Selects `name`. A blank name clears the filter.
    pub fn select(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.selected = (!name.trim().is_empty()).then_some(name);
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Query parameters for `GET /posts`.
    #[must_use]
    pub fn query(&self) -> Vec<(&'static str, String)> {
        self.selected
            .iter()
            .map(|name| ("tag", name.clone()))
            .collect()
    }
}
