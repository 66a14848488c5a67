//! Customization Session
//!
//! Working state while a customer configures one menu item. A session starts
//! [`SessionState::Initialized`], moves to [`SessionState::Editing`] on the
//! first change and ends either [`SessionState::Finalized`] (producing a
//! [`CartLine`]) or [`SessionState::Discarded`]. [`CustomizationSession::reset`]
//! returns it to defaults from any state.

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::CartLine,
    i18n::Translations,
    menu::{Ingredient, ItemId, MenuCatalog, MenuItem, search::fold},
    options::{ExtrasCatalog, OptionProfile, OptionRules, Size, Sweetness},
    pricing::{base_price, extras_total},
};

/// Errors raised by a customization session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The requested item is not in the catalog
    #[error("Item {0} is not available")]
    ItemUnavailable(ItemId),

    /// The session was already finalized or discarded
    #[error("Session is {0}; reset it before making changes")]
    Closed(SessionState),

    /// The item does not offer this extras catalog
    #[error("This item does not offer {0} extras")]
    ExtrasNotOffered(ExtrasCatalog),

    /// No ingredient with this name in the catalog
    #[error("Unknown {catalog} extra: {name}")]
    UnknownExtra {
        /// Catalog that was searched
        catalog: ExtrasCatalog,

        /// Name that was not found
        name: String,
    },

    /// The drink is not part of this item's bundle
    #[error("Drink {0} is not offered with this item")]
    UnknownDrink(ItemId),

    /// The bundle needs a different number of drinks
    #[error("Please choose {required} drink(s); {selected} selected")]
    DrinkCount {
        /// Drinks the bundle includes
        required: u32,

        /// Drinks currently chosen
        selected: u32,
    },
}

/// Lifecycle of a customization session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Defaults, nothing changed yet
    Initialized,

    /// At least one selection made
    Editing,

    /// Added to the cart
    Finalized,

    /// Abandoned without adding to the cart
    Discarded,
}

impl SessionState {
    /// Whether the session still accepts changes.
    pub fn is_open(self) -> bool {
        matches!(self, SessionState::Initialized | SessionState::Editing)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Initialized => f.write_str("initialized"),
            SessionState::Editing => f.write_str("editing"),
            SessionState::Finalized => f.write_str("finalized"),
            SessionState::Discarded => f.write_str("discarded"),
        }
    }
}

/// A drink that can be picked inside a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftDrinkOption {
    /// Drink item id
    pub id: ItemId,

    /// Display name
    pub name: String,

    /// Units chosen
    pub quantity: u32,
}

/// One item being customized.
#[derive(Debug, Clone)]
pub struct CustomizationSession<'a> {
    item: &'a MenuItem,
    profile: OptionProfile,
    translations: &'a Translations,
    savory_extras: &'a [Ingredient],
    sweet_extras: &'a [Ingredient],
    savory_selected: Vec<bool>,
    sweet_selected: Vec<bool>,
    drinks: Vec<SoftDrinkOption>,
    size: Size,
    sweetness: Sweetness,
    comments: String,
    state: SessionState,
}

impl<'a> CustomizationSession<'a> {
    /// Open a session for an item.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ItemUnavailable`] if the item is not in the catalog.
    pub fn open(
        catalog: &'a MenuCatalog,
        rules: &OptionRules,
        translations: &'a Translations,
        item_id: ItemId,
    ) -> Result<Self, SessionError> {
        let item = catalog
            .find_by_id(item_id)
            .ok_or(SessionError::ItemUnavailable(item_id))?;

        let profile = rules.resolve(item_id);

        let extras_for = |extras_catalog: ExtrasCatalog| -> &'a [Ingredient] {
            if profile.offers_extras(extras_catalog) {
                catalog.extras(extras_catalog)
            } else {
                &[]
            }
        };

        let savory_extras = extras_for(ExtrasCatalog::Savory);
        let sweet_extras = extras_for(ExtrasCatalog::Sweet);

        let drinks = profile
            .drink_bundle
            .iter()
            .flat_map(|bundle| bundle.eligible_drink_ids.iter())
            .filter_map(|id| catalog.find_by_id(*id))
            .map(|drink| SoftDrinkOption {
                id: drink.id,
                name: translations.translate(&drink.name).to_string(),
                quantity: 0,
            })
            .collect();

        debug!(item = item_id, ?profile, "customization session opened");

        Ok(Self {
            item,
            profile,
            translations,
            savory_extras,
            sweet_extras,
            savory_selected: vec![false; savory_extras.len()],
            sweet_selected: vec![false; sweet_extras.len()],
            drinks,
            size: Size::default(),
            sweetness: Sweetness::default(),
            comments: String::new(),
            state: SessionState::Initialized,
        })
    }

    /// Item being customized.
    pub fn item(&self) -> &'a MenuItem {
        self.item
    }

    /// Translated item name.
    pub fn display_name(&self) -> &str {
        self.translations.translate(&self.item.name)
    }

    /// Options the item offers.
    pub fn profile(&self) -> &OptionProfile {
        &self.profile
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Selected size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Selected sweetness.
    pub fn sweetness(&self) -> Sweetness {
        self.sweetness
    }

    /// Free-text comments.
    pub fn comments(&self) -> &str {
        &self.comments
    }

    /// Bundle drinks with their chosen quantities, in display order.
    pub fn drinks(&self) -> &[SoftDrinkOption] {
        &self.drinks
    }

    /// Extras offered from one catalog; empty when the item does not offer it.
    pub fn offered_extras(&self, catalog: ExtrasCatalog) -> &'a [Ingredient] {
        match catalog {
            ExtrasCatalog::Savory => self.savory_extras,
            ExtrasCatalog::Sweet => self.sweet_extras,
        }
    }

    /// Selected extras from one catalog, in catalog order.
    pub fn selected_extras(&self, catalog: ExtrasCatalog) -> Vec<&'a Ingredient> {
        let (extras, selected) = match catalog {
            ExtrasCatalog::Savory => (self.savory_extras, &self.savory_selected),
            ExtrasCatalog::Sweet => (self.sweet_extras, &self.sweet_selected),
        };

        extras
            .iter()
            .zip(selected)
            .filter(|(_, selected)| **selected)
            .map(|(ingredient, _)| ingredient)
            .collect()
    }

    /// Set the size. Ignored (returns `false`) when the item has no size choice.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] after finalize or discard.
    pub fn set_size(&mut self, size: Size) -> Result<bool, SessionError> {
        self.begin_edit()?;

        if !self.profile.size_selectable {
            return Ok(false);
        }

        self.size = size;

        Ok(true)
    }

    /// Set the sweetness. Ignored (returns `false`) when the item has no
    /// sweetness choice.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] after finalize or discard.
    pub fn set_sweetness(&mut self, sweetness: Sweetness) -> Result<bool, SessionError> {
        self.begin_edit()?;

        if !self.profile.sweetness_selectable {
            return Ok(false);
        }

        self.sweetness = sweetness;

        Ok(true)
    }

    /// Flip the selection of an extra, matched by name regardless of case and
    /// accents. Returns whether the extra is now selected.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Closed`] after finalize or discard.
    /// - [`SessionError::ExtrasNotOffered`] if the item does not offer the catalog.
    /// - [`SessionError::UnknownExtra`] if no extra has that name.
    pub fn toggle_extra(
        &mut self,
        catalog: ExtrasCatalog,
        name: &str,
    ) -> Result<bool, SessionError> {
        if !self.profile.offers_extras(catalog) {
            return Err(SessionError::ExtrasNotOffered(catalog));
        }

        self.begin_edit()?;

        let (extras, selected) = match catalog {
            ExtrasCatalog::Savory => (self.savory_extras, &mut self.savory_selected),
            ExtrasCatalog::Sweet => (self.sweet_extras, &mut self.sweet_selected),
        };

        let wanted = fold(name);

        let flag = extras
            .iter()
            .position(|ingredient| ingredient.name == name || fold(&ingredient.name) == wanted)
            .and_then(|position| selected.get_mut(position))
            .ok_or_else(|| SessionError::UnknownExtra {
                catalog,
                name: name.to_string(),
            })?;

        *flag = !*flag;

        Ok(*flag)
    }

    /// Change a bundle drink's quantity by `delta`.
    ///
    /// Returns `false` and changes nothing when the quantity would drop below
    /// zero or the bundle total would exceed its required count.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Closed`] after finalize or discard.
    /// - [`SessionError::UnknownDrink`] if the drink is not in this item's bundle.
    pub fn adjust_drink_quantity(
        &mut self,
        drink_id: ItemId,
        delta: i32,
    ) -> Result<bool, SessionError> {
        self.begin_edit()?;

        let required = self.required_drinks();
        let selected = self.selected_drink_count();

        let drink = self
            .drinks
            .iter_mut()
            .find(|drink| drink.id == drink_id)
            .ok_or(SessionError::UnknownDrink(drink_id))?;

        let Some(quantity) = drink.quantity.checked_add_signed(delta) else {
            return Ok(false);
        };

        if selected - drink.quantity + quantity > required {
            return Ok(false);
        }

        drink.quantity = quantity;

        Ok(true)
    }

    /// Replace the comments.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] after finalize or discard.
    pub fn set_comments(&mut self, comments: impl Into<String>) -> Result<(), SessionError> {
        self.begin_edit()?;

        self.comments = comments.into();

        Ok(())
    }

    /// Item price plus the size surcharge.
    pub fn base_price(&self) -> Decimal {
        base_price(self.item.price, self.effective_size())
    }

    /// Sum of the selected savory and sweet extras. Drinks are free.
    pub fn extras_total(&self) -> Decimal {
        extras_total(self.selected_extras(ExtrasCatalog::Savory))
            + extras_total(self.selected_extras(ExtrasCatalog::Sweet))
    }

    /// Price of one unit as currently configured.
    pub fn total_price(&self) -> Decimal {
        self.base_price() + self.extras_total()
    }

    /// Sum of all bundle drink quantities.
    pub fn selected_drink_count(&self) -> u32 {
        self.drinks.iter().map(|drink| drink.quantity).sum()
    }

    /// Drinks the bundle requires, zero when the item has no bundle.
    pub fn required_drinks(&self) -> u32 {
        self.profile
            .drink_bundle
            .as_ref()
            .map_or(0, |bundle| bundle.required_count)
    }

    /// Whether [`finalize`](Self::finalize) would succeed.
    pub fn can_finalize(&self) -> bool {
        self.state.is_open() && self.selected_drink_count() == self.required_drinks()
    }

    /// Finish the session and produce a cart line with quantity one.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Closed`] after finalize or discard.
    /// - [`SessionError::DrinkCount`] if a bundle's drink count is not exactly met.
    pub fn finalize(&mut self) -> Result<CartLine, SessionError> {
        self.ensure_open()?;

        let required = self.required_drinks();
        let selected = self.selected_drink_count();

        if selected != required {
            return Err(SessionError::DrinkCount { required, selected });
        }

        let mut ingredients: Vec<Ingredient> = self
            .selected_extras(ExtrasCatalog::Savory)
            .into_iter()
            .chain(self.selected_extras(ExtrasCatalog::Sweet))
            .cloned()
            .collect();

        for drink in &self.drinks {
            for _ in 0..drink.quantity {
                ingredients.push(Ingredient::new(drink.name.clone(), Decimal::ZERO));
            }
        }

        let line = CartLine {
            size: self.profile.size_selectable.then_some(self.size),
            sweetness: self.profile.sweetness_selectable.then_some(self.sweetness),
            ingredients,
            comments: self.comments.clone(),
            ..CartLine::new(self.item.id, self.display_name(), self.base_price())
        };

        self.state = SessionState::Finalized;

        debug!(item = self.item.id, "customization finalized");

        Ok(line)
    }

    /// Abandon the session. Has no effect once finalized.
    pub fn discard(&mut self) {
        if self.state.is_open() {
            self.state = SessionState::Discarded;
        }
    }

    /// Return to defaults: single, plain, nothing selected, no comments.
    pub fn reset(&mut self) {
        self.savory_selected.fill(false);
        self.sweet_selected.fill(false);

        for drink in &mut self.drinks {
            drink.quantity = 0;
        }

        self.size = Size::default();
        self.sweetness = Sweetness::default();
        self.comments.clear();
        self.state = SessionState::Initialized;
    }

    fn effective_size(&self) -> Size {
        if self.profile.size_selectable {
            self.size
        } else {
            Size::Single
        }
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.state.is_open() {
            Ok(())
        } else {
            Err(SessionError::Closed(self.state))
        }
    }

    fn begin_edit(&mut self) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.state = SessionState::Editing;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    struct Fixture {
        catalog: MenuCatalog,
        rules: OptionRules,
        translations: Translations,
    }

    impl Fixture {
        fn embedded() -> TestResult<Self> {
            let catalog = MenuCatalog::embedded()?;
            let rules = OptionRules::for_catalog(&catalog);

            Ok(Self {
                catalog,
                rules,
                translations: Translations::empty(),
            })
        }

        fn open(&self, id: ItemId) -> Result<CustomizationSession<'_>, SessionError> {
            CustomizationSession::open(&self.catalog, &self.rules, &self.translations, id)
        }
    }

    #[test]
    fn unknown_item_is_unavailable() -> TestResult {
        let fixture = Fixture::embedded()?;

        assert!(matches!(
            fixture.open(9_999),
            Err(SessionError::ItemUnavailable(9_999))
        ));

        Ok(())
    }

    #[test]
    fn opens_with_defaults() -> TestResult {
        let fixture = Fixture::embedded()?;
        let session = fixture.open(3)?;

        assert_eq!(session.state(), SessionState::Initialized);
        assert_eq!(session.size(), Size::Single);
        assert_eq!(session.sweetness(), Sweetness::Plain);
        assert_eq!(session.total_price(), session.item().price);

        Ok(())
    }

    #[test]
    fn double_adds_surcharge_for_eligible_items() -> TestResult {
        let fixture = Fixture::embedded()?;
        let mut session = fixture.open(3)?;
        let price = session.item().price;

        assert!(session.set_size(Size::Double)?);
        assert_eq!(session.base_price(), price + Decimal::new(50, 2));
        assert_eq!(session.state(), SessionState::Editing);

        Ok(())
    }

    #[test]
    fn size_is_ignored_for_ineligible_items() -> TestResult {
        let fixture = Fixture::embedded()?;
        let mut session = fixture.open(1)?;
        let price = session.item().price;

        assert!(!session.set_size(Size::Double)?);
        assert_eq!(session.base_price(), price);

        let line = session.finalize()?;

        assert_eq!(line.size, None);
        assert_eq!(line.sweetness, Some(Sweetness::Plain));

        Ok(())
    }

    #[test]
    fn extras_are_priced_and_listed_in_catalog_order() -> TestResult {
        let fixture = Fixture::embedded()?;
        let mut session = fixture.open(51)?;
        let extras = session.offered_extras(ExtrasCatalog::Savory);
        let (first, second) = (
            extras.first().ok_or("first extra")?,
            extras.get(1).ok_or("second extra")?,
        );

        assert!(session.toggle_extra(ExtrasCatalog::Savory, &second.name)?);
        assert!(session.toggle_extra(ExtrasCatalog::Savory, &first.name)?);

        assert_eq!(
            session.total_price(),
            session.item().price + first.price + second.price
        );

        let line = session.finalize()?;

        assert_eq!(line.ingredients, vec![first.clone(), second.clone()]);
        assert_eq!(line.quantity, 1);

        Ok(())
    }

    #[test]
    fn toggling_twice_deselects() -> TestResult {
        let fixture = Fixture::embedded()?;
        let mut session = fixture.open(106)?;
        let name = session
            .offered_extras(ExtrasCatalog::Sweet)
            .first()
            .ok_or("sweet extra")?
            .name
            .clone();

        assert!(session.toggle_extra(ExtrasCatalog::Sweet, &name)?);
        assert!(!session.toggle_extra(ExtrasCatalog::Sweet, &name)?);
        assert_eq!(session.extras_total(), Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn extras_from_other_catalog_are_rejected() -> TestResult {
        let fixture = Fixture::embedded()?;
        let mut session = fixture.open(51)?;

        assert_eq!(
            session.toggle_extra(ExtrasCatalog::Sweet, "anything"),
            Err(SessionError::ExtrasNotOffered(ExtrasCatalog::Sweet))
        );
        assert!(matches!(
            session.toggle_extra(ExtrasCatalog::Savory, "caviar"),
            Err(SessionError::UnknownExtra { .. })
        ));

        Ok(())
    }

    #[test]
    fn drink_quantities_are_capped_by_the_bundle() -> TestResult {
        let fixture = Fixture::embedded()?;
        let mut session = fixture.open(202)?;

        assert!(!session.adjust_drink_quantity(15, -1)?);
        assert!(session.adjust_drink_quantity(15, 1)?);
        assert!(!session.adjust_drink_quantity(16, 1)?);
        assert_eq!(session.selected_drink_count(), 1);

        assert_eq!(
            session.adjust_drink_quantity(23, 1),
            Err(SessionError::UnknownDrink(23))
        );

        Ok(())
    }

    #[test]
    fn bundle_requires_exact_count() -> TestResult {
        let fixture = Fixture::embedded()?;
        let mut session = fixture.open(200)?;

        assert_eq!(
            session.finalize(),
            Err(SessionError::DrinkCount {
                required: 2,
                selected: 0
            })
        );

        session.adjust_drink_quantity(15, 1)?;

        assert!(!session.can_finalize());
        assert_eq!(
            session.finalize(),
            Err(SessionError::DrinkCount {
                required: 2,
                selected: 1
            })
        );

        session.adjust_drink_quantity(16, 1)?;

        let line = session.finalize()?;

        assert_eq!(line.ingredients.len(), 2);
        assert!(line.ingredients.iter().all(|drink| drink.price.is_zero()));
        assert_eq!(line.unit_price(), session.item().price);

        Ok(())
    }

    #[test]
    fn finalized_session_rejects_changes_until_reset() -> TestResult {
        let fixture = Fixture::embedded()?;
        let mut session = fixture.open(3)?;

        session.set_sweetness(Sweetness::Sweet)?;
        session.finalize()?;

        assert_eq!(
            session.set_size(Size::Double),
            Err(SessionError::Closed(SessionState::Finalized))
        );
        assert!(session.finalize().is_err());

        session.reset();

        assert_eq!(session.state(), SessionState::Initialized);
        assert_eq!(session.sweetness(), Sweetness::Plain);
        assert!(session.set_size(Size::Double)?);

        Ok(())
    }

    #[test]
    fn discarded_session_rejects_changes() -> TestResult {
        let fixture = Fixture::embedded()?;
        let mut session = fixture.open(51)?;

        session.set_comments("extra crispy")?;
        session.discard();

        assert_eq!(session.state(), SessionState::Discarded);
        assert!(matches!(
            session.set_comments("more"),
            Err(SessionError::Closed(SessionState::Discarded))
        ));

        Ok(())
    }

    #[test]
    fn reset_wipes_every_selection() -> TestResult {
        let fixture = Fixture::embedded()?;
        let mut session = fixture.open(200)?;

        session.adjust_drink_quantity(15, 2)?;
        session.set_comments("no ice")?;
        session.reset();

        assert_eq!(session.selected_drink_count(), 0);
        assert!(session.comments().is_empty());

        Ok(())
    }

    #[test]
    fn drink_count_message_names_both_counts() {
        let message = SessionError::DrinkCount {
            required: 2,
            selected: 1,
        }
        .to_string();

        assert!(message.contains('2'));
        assert!(message.contains('1'));
    }
}
