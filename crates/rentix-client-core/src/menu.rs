//! Navigation entries shown to the user, derived from the current role

use rentix_shared::uac::CurrentRole;

use crate::navigation::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub route: Route,
}

impl MenuEntry {
    const fn new(label: &'static str, route: Route) -> Self {
        Self { label, route }
    }
}

const DASHBOARD: MenuEntry = MenuEntry::new("Dashboard", Route::Dashboard);
const CREATE_COMPANY: MenuEntry = MenuEntry::new("Create company", Route::CreateCompany);
const OPERATIONS: [MenuEntry; 4] = [
    MenuEntry::new("Properties", Route::Properties),
    MenuEntry::new("Contracts", Route::Contracts),
    MenuEntry::new("Tenants", Route::Tenants),
    MenuEntry::new("Taxes", Route::Taxes),
];
const TEAM: MenuEntry = MenuEntry::new("Team", Route::Team);
const SETTINGS: MenuEntry = MenuEntry::new("Settings", Route::Settings);
const TENANT_AREA: [MenuEntry; 3] = [
    MenuEntry::new("My contracts", Route::MyContracts),
    MenuEntry::new("My invoices", Route::MyInvoices),
    MenuEntry::new("Fiscal profile", Route::FiscalProfile),
];

/// Dashboard always comes first. Recompute whenever the role changes
pub fn project_menu(role: CurrentRole) -> Vec<MenuEntry> {
    let privileged = role.is_platform_privileged();
    let manages = privileged || role.is_owner();

    let mut result = vec![DASHBOARD];
    if privileged {
        result.push(CREATE_COMPANY);
    }
    if manages {
        result.extend(OPERATIONS);
    }
    if role.is_owner() {
        result.push(TEAM);
    }
    if manages {
        result.push(SETTINGS);
    }
    if role.is_tenant() {
        result.extend(TENANT_AREA);
    }
    result
}
