//! Inicio: project overview.

use super::content;
use super::{Section, SectionView};

pub fn build() -> SectionView {
    let mut view = SectionView::new(Section::Inicio);
    view.heading(content::DASHBOARD_TITLE);
    view.paragraph(content::HOME_INTRO);
    view.insights(content::home_areas());
    view
}
