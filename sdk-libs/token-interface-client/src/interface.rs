//! Unified view over every hot and cold balance of one `(owner, mint)`.
use solana_account::Account;
use solana_pubkey::Pubkey;

use crate::{
    address::AtaType,
    error::{Result, TokenInterfaceError},
    layout::{AccountState, ParsedTokenAccount},
    source::{LoadContext, TokenAccountSource},
};

#[derive(Clone, Debug, PartialEq)]
pub struct AccountInterface {
    /// Canonical address the balance is reported under.
    pub address: Pubkey,
    pub owner: Pubkey,
    pub mint: Pubkey,
    /// Raw account of the primary source.
    pub account: Account,
    /// Primary source's view, with `amount` replaced by the total. Frozen
    /// if any source is.
    pub parsed: ParsedTokenAccount,
    /// Sorted by source priority.
    pub sources: Vec<TokenAccountSource>,
    pub needs_consolidation: bool,
    pub has_delegate: bool,
    pub any_frozen: bool,
    /// Set when fetched as an associated token account.
    pub ata_type: Option<AtaType>,
}

impl AccountInterface {
    #[inline]
    pub fn amount(&self) -> u64 {
        self.parsed.amount
    }

    #[inline]
    pub fn primary_source(&self) -> Option<&TokenAccountSource> {
        self.sources.first()
    }

    /// True if the primary source is cold.
    #[inline]
    pub fn is_cold(&self) -> bool {
        self.primary_source().is_some_and(|s| s.is_cold())
    }

    #[inline]
    pub fn load_context(&self) -> Option<&LoadContext> {
        self.primary_source().and_then(|s| s.load_context.as_ref())
    }

    pub fn cold_sources(&self) -> impl Iterator<Item = &TokenAccountSource> {
        self.sources.iter().filter(|s| s.is_cold())
    }

    pub fn hot_sources(&self) -> impl Iterator<Item = &TokenAccountSource> {
        self.sources.iter().filter(|s| !s.is_cold())
    }

    /// Sum of sources that are not frozen.
    pub fn unfrozen_amount(&self) -> Result<u64> {
        checked_sum(self.sources.iter().filter(|s| !s.is_frozen()).map(|s| s.amount))
    }

    pub fn frozen_amount(&self) -> Result<u64> {
        checked_sum(self.sources.iter().filter(|s| s.is_frozen()).map(|s| s.amount))
    }
}

pub(crate) fn checked_sum(amounts: impl IntoIterator<Item = u64>) -> Result<u64> {
    amounts.into_iter().try_fold(0u64, |total, amount| {
        total
            .checked_add(amount)
            .ok_or(TokenInterfaceError::ArithmeticOverflow)
    })
}

/// Aggregates `sources` into one interface reported under
/// `canonical_address`. The highest priority source becomes primary.
pub fn build_account_interface_from_sources(
    mut sources: Vec<TokenAccountSource>,
    canonical_address: Pubkey,
) -> Result<AccountInterface> {
    // Stable, so equal priorities keep fetch order.
    sources.sort_by_key(|s| s.source_type.priority());
    let primary = sources
        .first()
        .ok_or(TokenInterfaceError::AccountNotFound(canonical_address))?;

    let total = checked_sum(sources.iter().map(|s| s.amount))?;
    let any_frozen = sources.iter().any(|s| s.is_frozen());
    let mut parsed = primary.parsed.clone();
    parsed.address = canonical_address;
    parsed.amount = total;
    if any_frozen {
        parsed.state = AccountState::Frozen;
    }

    Ok(AccountInterface {
        address: canonical_address,
        owner: primary.parsed.owner,
        mint: primary.parsed.mint,
        account: primary.account.clone(),
        parsed,
        needs_consolidation: sources.len() > 1,
        has_delegate: sources.iter().any(|s| s.parsed.delegate.is_some()),
        any_frozen,
        sources,
        ata_type: None,
    })
}

/// Owner may spend everything. A delegate may spend, per source delegated
/// to it, the lesser of amount and delegated amount.
pub fn spendable_amount_for_authority(
    interface: &AccountInterface,
    authority: &Pubkey,
) -> Result<u64> {
    if *authority == interface.owner {
        return Ok(interface.amount());
    }
    checked_sum(interface.sources.iter().map(|s| s.spendable_for(authority)))
}

pub fn is_authority_for_interface(interface: &AccountInterface, authority: &Pubkey) -> bool {
    *authority == interface.owner
        || interface
            .sources
            .iter()
            .any(|s| s.parsed.delegate.as_ref() == Some(authority))
}

/// Restricts `interface` to the sources `authority` can spend from. The
/// reported amount becomes the authority's spendable amount.
pub fn filter_interface_for_authority(
    interface: &AccountInterface,
    authority: &Pubkey,
) -> Result<AccountInterface> {
    if *authority == interface.owner {
        return Ok(interface.clone());
    }

    let sources: Vec<TokenAccountSource> = interface
        .sources
        .iter()
        .filter(|s| s.parsed.delegate.as_ref() == Some(authority))
        .cloned()
        .collect();
    let spendable = checked_sum(sources.iter().map(|s| s.spendable_for(authority)))?;

    let mut filtered = interface.clone();
    if let Some(primary) = sources.first() {
        filtered.account = primary.account.clone();
        filtered.parsed = primary.parsed.clone();
        filtered.parsed.address = interface.address;
    }
    filtered.parsed.amount = spendable;
    filtered.needs_consolidation = sources.len() > 1;
    filtered.has_delegate = !sources.is_empty();
    filtered.any_frozen = sources.iter().any(|s| s.is_frozen());
    if filtered.any_frozen {
        filtered.parsed.state = AccountState::Frozen;
    }
    filtered.sources = sources;
    Ok(filtered)
}


#[cfg(test)]
mod tests {
    use super::{test_utils::*, *};
    use crate::{layout::AccountState, source::TokenAccountSourceType};

    #[test]
    fn test_build_from_sources_picks_priority_primary() {
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let address = Pubkey::new_unique();
        let sources = vec![
            hot_source(
                TokenAccountSourceType::Spl,
                mint,
                owner,
                10,
                None,
                AccountState::Initialized,
            ),
            cold_source(mint, owner, 20, 1, None, AccountState::Initialized, None),
            hot_source(
                TokenAccountSourceType::LightTokenHot,
                mint,
                owner,
                30,
                None,
                AccountState::Initialized,
            ),
        ];

        let interface = build_account_interface_from_sources(sources, address).unwrap();
        assert_eq!(interface.amount(), 60);
        assert_eq!(interface.address, address);
        assert_eq!(interface.parsed.address, address);
        assert_eq!(
            interface.sources[0].source_type,
            TokenAccountSourceType::LightTokenHot
        );
        assert_eq!(
            interface.sources[1].source_type,
            TokenAccountSourceType::LightTokenCold
        );
        assert_eq!(interface.sources[2].source_type, TokenAccountSourceType::Spl);
        assert!(interface.needs_consolidation);
        assert!(!interface.is_cold());
        assert!(interface.load_context().is_none());
        assert!(!interface.any_frozen);
        assert!(!interface.has_delegate);
    }

    #[test]
    fn test_build_from_cold_only() {
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let sources = vec![cold_source(
            mint,
            owner,
            20,
            1,
            None,
            AccountState::Frozen,
            None,
        )];

        let interface = build_account_interface_from_sources(sources, Pubkey::new_unique()).unwrap();
        assert!(interface.is_cold());
        assert!(interface.load_context().is_some());
        assert!(!interface.needs_consolidation);
        assert!(interface.any_frozen);
        assert_eq!(interface.unfrozen_amount().unwrap(), 0);
        assert_eq!(interface.frozen_amount().unwrap(), 20);
    }

    #[test]
    fn test_frozen_state_covers_all_sources() {
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let delegate = Pubkey::new_unique();
        let sources = vec![
            hot_source(
                TokenAccountSourceType::LightTokenHot,
                mint,
                owner,
                100,
                Some((delegate, 100)),
                AccountState::Initialized,
            ),
            cold_source(mint, owner, 50, 1, Some(delegate), AccountState::Frozen, None),
        ];
        let interface = build_account_interface_from_sources(sources, Pubkey::new_unique()).unwrap();
        assert!(!interface.sources[0].is_frozen());
        assert!(interface.any_frozen);
        assert!(interface.parsed.is_frozen());
        assert_eq!(interface.unfrozen_amount().unwrap(), 100);

        let filtered = filter_interface_for_authority(&interface, &delegate).unwrap();
        assert_eq!(filtered.sources.len(), 2);
        assert!(filtered.any_frozen);
        assert!(filtered.parsed.is_frozen());
    }

    #[test]
    fn test_unfrozen_sources_keep_primary_state() {
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let sources = vec![
            hot_source(
                TokenAccountSourceType::LightTokenHot,
                mint,
                owner,
                100,
                None,
                AccountState::Initialized,
            ),
            cold_source(mint, owner, 50, 1, None, AccountState::Initialized, None),
        ];
        let interface = build_account_interface_from_sources(sources, Pubkey::new_unique()).unwrap();
        assert!(!interface.any_frozen);
        assert_eq!(interface.parsed.state, AccountState::Initialized);
    }

    #[test]
    fn test_delegate_taken_from_primary() {
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let cold_delegate = Pubkey::new_unique();

        // Only the cold source is delegated.
        let sources = vec![
            hot_source(
                TokenAccountSourceType::LightTokenHot,
                mint,
                owner,
                100,
                None,
                AccountState::Initialized,
            ),
            cold_source(
                mint,
                owner,
                50,
                1,
                Some(cold_delegate),
                AccountState::Initialized,
                None,
            ),
        ];
        let interface = build_account_interface_from_sources(sources, Pubkey::new_unique()).unwrap();
        assert_eq!(interface.parsed.delegate, None);
        assert_eq!(interface.parsed.delegated_amount, 0);
        assert!(interface.has_delegate);
        assert!(is_authority_for_interface(&interface, &cold_delegate));

        // Different delegates, the primary's wins.
        let hot_delegate = Pubkey::new_unique();
        let sources = vec![
            cold_source(
                mint,
                owner,
                50,
                1,
                Some(cold_delegate),
                AccountState::Initialized,
                None,
            ),
            hot_source(
                TokenAccountSourceType::LightTokenHot,
                mint,
                owner,
                100,
                Some((hot_delegate, 40)),
                AccountState::Initialized,
            ),
        ];
        let interface = build_account_interface_from_sources(sources, Pubkey::new_unique()).unwrap();
        assert_eq!(
            interface.sources[0].source_type,
            TokenAccountSourceType::LightTokenHot
        );
        assert_eq!(interface.parsed.delegate, Some(hot_delegate));
        assert_eq!(interface.parsed.delegated_amount, 40);
        assert_eq!(interface.amount(), 150);
        assert!(interface.has_delegate);
        assert_eq!(
            spendable_amount_for_authority(&interface, &cold_delegate).unwrap(),
            50
        );
    }

    #[test]
    fn test_build_from_no_sources() {
        let address = Pubkey::new_unique();
        assert!(matches!(
            build_account_interface_from_sources(vec![], address),
            Err(TokenInterfaceError::AccountNotFound(a)) if a == address
        ));
    }

    #[test]
    fn test_build_overflow() {
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let sources = vec![
            cold_source(mint, owner, u64::MAX, 1, None, AccountState::Initialized, None),
            cold_source(mint, owner, 1, 2, None, AccountState::Initialized, None),
        ];
        assert!(matches!(
            build_account_interface_from_sources(sources, Pubkey::new_unique()),
            Err(TokenInterfaceError::ArithmeticOverflow)
        ));
    }

    #[test]
    fn test_authority_views() {
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let delegate = Pubkey::new_unique();
        let stranger = Pubkey::new_unique();
        let sources = vec![
            hot_source(
                TokenAccountSourceType::LightTokenHot,
                mint,
                owner,
                100,
                Some((delegate, 40)),
                AccountState::Initialized,
            ),
            cold_source(mint, owner, 50, 1, Some(delegate), AccountState::Initialized, None),
            cold_source(mint, owner, 70, 2, None, AccountState::Initialized, None),
        ];
        let interface = build_account_interface_from_sources(sources, Pubkey::new_unique()).unwrap();

        assert_eq!(spendable_amount_for_authority(&interface, &owner).unwrap(), 220);
        assert_eq!(spendable_amount_for_authority(&interface, &delegate).unwrap(), 90);
        assert_eq!(spendable_amount_for_authority(&interface, &stranger).unwrap(), 0);

        assert!(is_authority_for_interface(&interface, &owner));
        assert!(is_authority_for_interface(&interface, &delegate));
        assert!(!is_authority_for_interface(&interface, &stranger));

        let filtered = filter_interface_for_authority(&interface, &delegate).unwrap();
        assert_eq!(filtered.sources.len(), 2);
        assert_eq!(filtered.amount(), 90);
        assert!(filtered.needs_consolidation);
        assert_eq!(filtered.address, interface.address);

        let owner_view = filter_interface_for_authority(&interface, &owner).unwrap();
        assert_eq!(owner_view, interface);

        let empty = filter_interface_for_authority(&interface, &stranger).unwrap();
        assert!(empty.sources.is_empty());
        assert_eq!(empty.amount(), 0);
    }
}
