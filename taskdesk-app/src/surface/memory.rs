use std::collections::HashMap;

use super::{Block, DisplaySurface, ListItem, Region, SelectOption, Selector};

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedList {
    pub header: String,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegionContent {
    List(RenderedList),
    Panel(Vec<Block>),
}

/// In-memory virtual DOM. Holds the latest content of every region and
/// selector plus the notices and errors shown so far.
#[derive(Debug, Default)]
pub struct MemorySurface {
    regions: HashMap<Region, RegionContent>,
    selectors: HashMap<Selector, Vec<SelectOption>>,
    notices: Vec<String>,
    errors: Vec<String>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(&self, region: Region) -> Option<&RegionContent> {
        self.regions.get(&region)
    }

    pub fn list(&self, region: Region) -> Option<&RenderedList> {
        match self.regions.get(&region) {
            Some(RegionContent::List(list)) => Some(list),
            _ => None,
        }
    }

    pub fn list_texts(&self, region: Region) -> Vec<String> {
        self.list(region)
            .map(|list| list.items.iter().map(|item| item.text.clone()).collect())
            .unwrap_or_default()
    }

    pub fn panel(&self, region: Region) -> Option<&[Block]> {
        match self.regions.get(&region) {
            Some(RegionContent::Panel(blocks)) => Some(blocks),
            _ => None,
        }
    }

    pub fn options(&self, selector: Selector) -> Option<&[SelectOption]> {
        self.selectors.get(&selector).map(Vec::as_slice)
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl DisplaySurface for MemorySurface {
    fn render_list(&mut self, region: Region, header: &str, items: Vec<ListItem>) {
        self.regions.insert(
            region,
            RegionContent::List(RenderedList {
                header: header.to_string(),
                items,
            }),
        );
    }

    fn render_options(&mut self, selector: Selector, options: Vec<SelectOption>) {
        self.selectors.insert(selector, options);
    }

    fn render_panel(&mut self, region: Region, blocks: Vec<Block>) {
        self.regions.insert(region, RegionContent::Panel(blocks));
    }

    fn show_notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
