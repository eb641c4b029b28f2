//! Mapping table for escrow records
//!
//! Canonical paths follow the nested detail-page layout. Later candidates are
//! the flat camelCase and snake_case keys older record payloads used.

use super::ValueType::{Boolean, Currency, Date, Percent, Text};
use super::{EntityRoutes, FieldDef, FieldMapping};
use crate::error::Result;

const COLLECTION: &str = "escrows";
const ID_PREFIX: &str = "escrow-";

const BLOB_PEOPLE: &str = "people";
const BLOB_CHECKLISTS: &str = "checklists";
const BLOB_TIMELINE: &str = "timeline";
const BLOB_FINANCIALS: &str = "financials";

#[rustfmt::skip]
const ESCROW_FIELDS: &[FieldDef] = &[
    // Basic
    FieldDef::flat("Escrow Number", &["escrowNumber", "escrow_number"], "escrow_number", Text),
    FieldDef::flat("Property Address", &["propertyAddress", "property_address"], "property_address", Text),
    FieldDef::flat("Status", &["escrowStatus", "escrow_status"], "escrow_status", Text),
    FieldDef::flat("Purchase Price", &["purchasePrice", "purchase_price"], "purchase_price", Currency),
    FieldDef::flat("My Commission", &["myCommission", "my_commission"], "my_commission", Currency),
    FieldDef::flat("Zillow URL", &["zillowUrl", "zillow_url"], "zillow_url", Text),
    FieldDef::flat("Property Image URL", &["propertyImage", "property_image_url"], "property_image_url", Text),

    // Property details
    FieldDef::flat("City", &["propertyDetails.city", "city"], "city", Text),
    FieldDef::flat("State", &["propertyDetails.state", "state"], "state", Text),
    FieldDef::flat("ZIP Code", &["propertyDetails.zipCode", "zip_code", "zipCode"], "zip_code", Text),
    FieldDef::flat("County", &["propertyDetails.county", "county"], "county", Text),
    FieldDef::flat("Bedrooms", &["propertyDetails.bedrooms", "bedrooms"], "bedrooms", Text),
    FieldDef::flat("Bathrooms", &["propertyDetails.bathrooms", "bathrooms"], "bathrooms", Text),
    FieldDef::flat("Square Feet", &["propertyDetails.squareFeet", "square_feet", "squareFeet"], "square_feet", Text),
    FieldDef::flat("Lot Size (sqft)", &["propertyDetails.lotSize", "lot_size_sqft", "lotSize"], "lot_size_sqft", Text),
    FieldDef::flat("Year Built", &["propertyDetails.yearBuilt", "year_built", "yearBuilt"], "year_built", Text),
    FieldDef::flat("Garage Spaces", &["propertyDetails.garageSpaces", "garage_spaces", "garageSpaces"], "garage_spaces", Text),
    FieldDef::flat("Stories", &["propertyDetails.stories", "stories"], "stories", Text),
    FieldDef::flat("View Type", &["propertyDetails.viewType", "view_type", "viewType"], "view_type", Text),
    FieldDef::flat("Architectural Style", &["propertyDetails.architecturalStyle", "architectural_style", "architecturalStyle"], "architectural_style", Text),
    FieldDef::flat("Property Condition", &["propertyDetails.propertyCondition", "property_condition", "propertyCondition"], "property_condition", Text),
    FieldDef::flat("Zoning", &["propertyDetails.zoning", "zoning"], "zoning", Text),
    FieldDef::flat("APN", &["propertyDetails.apn", "apn"], "apn", Text),
    FieldDef::flat("MLS Number", &["propertyDetails.mlsNumber", "mls_number", "mlsNumber"], "mls_number", Text),
    FieldDef::flat("Subdivision", &["propertyDetails.subdivision", "subdivision"], "subdivision", Text),
    FieldDef::flat("Cross Streets", &["propertyDetails.crossStreets", "cross_streets", "crossStreets"], "cross_streets", Text),
    FieldDef::flat("HOA Fee", &["propertyDetails.hoaFee", "hoa_fee", "hoaFee"], "hoa_fee", Currency),
    FieldDef::flat("HOA Frequency", &["propertyDetails.hoaFrequency", "hoa_frequency", "hoaFrequency"], "hoa_frequency", Text),
    FieldDef::flat("HOA Name", &["propertyDetails.hoaName", "hoa_name", "hoaName"], "hoa_name", Text),
    FieldDef::flat("Pool", &["propertyDetails.pool", "pool"], "pool", Boolean),
    FieldDef::flat("Spa", &["propertyDetails.spa", "spa"], "spa", Boolean),
    FieldDef::flat("Gated Community", &["propertyDetails.gatedCommunity", "gated_community", "gatedCommunity"], "gated_community", Boolean),
    FieldDef::flat("Senior Community", &["propertyDetails.seniorCommunity", "senior_community", "seniorCommunity"], "senior_community", Boolean),
    FieldDef::flat("List Price", &["propertyDetails.listPrice", "list_price", "listPrice"], "list_price", Currency),
    FieldDef::flat("List Date", &["propertyDetails.listDate", "list_date", "listDate"], "list_date", Date),
    FieldDef::flat("Days on Market", &["propertyDetails.daysOnMarket", "days_on_market", "daysOnMarket"], "days_on_market", Text),
    FieldDef::flat("Previous List Price", &["propertyDetails.previousListPrice", "previous_list_price", "previousListPrice"], "previous_list_price", Currency),
    FieldDef::flat("Original List Price", &["propertyDetails.originalListPrice", "original_list_price", "originalListPrice"], "original_list_price", Currency),

    // Transaction details
    FieldDef::flat("Escrow Status", &["transactionDetails.escrowStatus", "escrow_status", "escrowStatus"], "escrow_status", Text),
    FieldDef::flat("Purchase Price", &["transactionDetails.purchasePrice", "purchase_price", "purchasePrice"], "purchase_price", Currency),
    FieldDef::flat("Earnest Money Deposit", &["transactionDetails.earnestMoneyDeposit", "earnest_money_deposit", "earnestMoneyDeposit"], "earnest_money_deposit", Currency),
    FieldDef::flat("Down Payment", &["transactionDetails.downPayment", "down_payment", "downPayment"], "down_payment", Currency),
    FieldDef::flat("Loan Amount", &["transactionDetails.loanAmount", "loan_amount", "loanAmount"], "loan_amount", Currency),
    FieldDef::flat("Transaction Type", &["transactionDetails.transactionType", "transaction_type", "transactionType"], "transaction_type", Text),
    FieldDef::flat("Closing Date", &["transactionDetails.closingDate", "closing_date", "closingDate"], "closing_date", Date),
    FieldDef::flat("Acceptance Date", &["transactionDetails.acceptanceDate", "acceptance_date", "acceptanceDate"], "acceptance_date", Date),
    FieldDef::flat("Opening Date", &["transactionDetails.openingDate", "opening_date", "openingDate"], "opening_date", Date),
    FieldDef::flat("Escrow Number", &["transactionDetails.escrowNumber", "escrow_number", "escrowNumber"], "escrow_number", Text),
    FieldDef::flat("Escrow Company", &["transactionDetails.escrowCompany", "escrow_company", "escrowCompany"], "escrow_company", Text),
    FieldDef::flat("Escrow Officer", &["transactionDetails.escrowOfficer", "escrow_officer", "escrowOfficer"], "escrow_officer", Text),
    FieldDef::flat("Escrow Phone", &["transactionDetails.escrowPhone", "escrow_phone", "escrowPhone"], "escrow_phone", Text),
    FieldDef::flat("Escrow Email", &["transactionDetails.escrowEmail", "escrow_email", "escrowEmail"], "escrow_email", Text),
    FieldDef::flat("Title Company", &["transactionDetails.titleCompany", "title_company", "titleCompany"], "title_company", Text),
    FieldDef::flat("Title Officer", &["transactionDetails.titleOfficer", "title_officer", "titleOfficer"], "title_officer", Text),
    FieldDef::flat("NHD Company", &["transactionDetails.nhdCompany", "nhd_company", "nhdCompany"], "nhd_company", Text),
    FieldDef::flat("Home Warranty Company", &["transactionDetails.homeWarrantyCompany", "home_warranty_company", "homeWarrantyCompany"], "home_warranty_company", Text),
    FieldDef::flat("Home Warranty Amount", &["transactionDetails.homeWarrantyAmount", "home_warranty_amount", "homeWarrantyAmount"], "home_warranty_amount", Currency),
    FieldDef::flat("Home Warranty Order #", &["transactionDetails.homeWarrantyOrderNumber", "home_warranty_order_number", "homeWarrantyOrderNumber"], "home_warranty_order_number", Text),
    FieldDef::flat("Home Inspection Company", &["transactionDetails.homeInspectionCompany", "home_inspection_company", "homeInspectionCompany"], "home_inspection_company", Text),
    FieldDef::flat("Lead Source", &["transactionDetails.leadSource", "lead_source", "leadSource"], "lead_source", Text),
    FieldDef::flat("Transaction Coordinator", &["transactionDetails.transactionCoordinator", "transaction_coordinator", "transactionCoordinator"], "transaction_coordinator", Text),
    FieldDef::flat("AVID", &["transactionDetails.avid", "avid"], "avid", Boolean),

    // Commission details
    FieldDef::flat("Commission Percentage", &["commissionDetails.commissionPercentage", "commission_percentage", "commissionPercentage"], "commission_percentage", Percent),
    FieldDef::flat("Gross Commission", &["commissionDetails.grossCommission", "gross_commission", "grossCommission"], "gross_commission", Currency),
    FieldDef::flat("My Commission", &["commissionDetails.myCommission", "my_commission", "myCommission"], "my_commission", Currency),
    FieldDef::flat("Net Commission", &["commissionDetails.netCommission", "net_commission", "netCommission"], "net_commission", Currency),
    FieldDef::flat("Buyer Side Commission", &["commissionDetails.buyerSideCommission", "buyer_side_commission", "buyerSideCommission"], "buyer_side_commission", Currency),
    FieldDef::flat("Listing Side Commission", &["commissionDetails.listingSideCommission", "listing_side_commission", "listingSideCommission"], "listing_side_commission", Currency),
    FieldDef::flat("Referral Fee", &["commissionDetails.referralFee", "referral_fee", "referralFee"], "referral_fee", Currency),
    FieldDef::flat("Referral Agent", &["commissionDetails.referralAgent", "referral_agent", "referralAgent"], "referral_agent", Text),
    FieldDef::flat("TC Fee", &["commissionDetails.tcFee", "tc_fee", "tcFee"], "tc_fee", Currency),
    FieldDef::flat("Admin Fee", &["commissionDetails.adminFee", "admin_fee", "adminFee"], "admin_fee", Currency),
    FieldDef::flat("Brokerage Split", &["commissionDetails.brokerageSplit", "brokerage_split", "brokerageSplit"], "brokerage_split", Percent),
    FieldDef::flat("Commission Adjustments", &["commissionDetails.commissionAdjustments", "commission_adjustments", "commissionAdjustments"], "commission_adjustments", Currency),
    FieldDef::flat("Expense Adjustments", &["commissionDetails.expenseAdjustments", "expense_adjustments", "expenseAdjustments"], "expense_adjustments", Currency),

    // Timeline blob, patched through the entity root
    FieldDef::blob("Acceptance Date", &["timeline.acceptanceDate", "acceptance_date", "acceptanceDate"], BLOB_TIMELINE, Date),
    FieldDef::blob("Opening Date", &["timeline.openingDate", "opening_date", "openingDate"], BLOB_TIMELINE, Date),
    FieldDef::blob("Closing Date", &["timeline.closingDate", "closing_date", "closingDate"], BLOB_TIMELINE, Date),
    FieldDef::blob("Actual COE Date", &["timeline.actualCoeDate", "actual_coe_date", "actualCoeDate"], BLOB_TIMELINE, Date),
    FieldDef::blob("RPA Deadline", &["timeline.rpaDeadline", "rpa_deadline"], BLOB_TIMELINE, Date),
    FieldDef::blob("Contract Signed", &["timeline.contractSigned", "contract_signed"], BLOB_TIMELINE, Date),
    FieldDef::blob("Deposit Made", &["timeline.depositMade", "deposit_made"], BLOB_TIMELINE, Date),
    FieldDef::blob("Contingency Removal", &["timeline.contingencyRemoval", "contingency_removal"], BLOB_TIMELINE, Date),
    FieldDef::blob("Loan Approval", &["timeline.loanApproval", "loan_approval"], BLOB_TIMELINE, Date),
    FieldDef::blob("Appraisal Completed", &["timeline.appraisalCompleted", "appraisal_completed"], BLOB_TIMELINE, Date),
    FieldDef::blob("Final Walkthrough", &["timeline.finalWalkthrough", "final_walkthrough"], BLOB_TIMELINE, Date),

    // Financials blob, patched through the entity root
    FieldDef::blob("Base Commission", &["financials.baseCommission"], BLOB_FINANCIALS, Currency),
    FieldDef::blob("Gross Commission", &["financials.grossCommission"], BLOB_FINANCIALS, Currency),
    FieldDef::blob("Agent Split", &["financials.splitPercentage"], BLOB_FINANCIALS, Percent),
    FieldDef::blob("Agent Commission", &["financials.agentCommission"], BLOB_FINANCIALS, Currency),
    FieldDef::blob("Transaction Fee", &["financials.transactionFee"], BLOB_FINANCIALS, Currency),
    FieldDef::blob("TC Fee", &["financials.tcFee"], BLOB_FINANCIALS, Currency),
    FieldDef::blob("Franchise Fees", &["financials.franchiseFees"], BLOB_FINANCIALS, Currency),
    FieldDef::blob("Agent Net", &["financials.agentNet"], BLOB_FINANCIALS, Currency),
    FieldDef::blob("Lead Source", &["financials.leadSource"], BLOB_FINANCIALS, Text),

    // People blob, patched through /people
    FieldDef::blob("Listing Agent", &["people.listingAgent"], BLOB_PEOPLE, Text),
    FieldDef::blob("Buyers Agent", &["people.buyersAgent"], BLOB_PEOPLE, Text),
    FieldDef::blob("Escrow Officer", &["people.escrowOfficer"], BLOB_PEOPLE, Text),
    FieldDef::blob("Loan Officer", &["people.loanOfficer"], BLOB_PEOPLE, Text),
    FieldDef::blob("Transaction Coordinator", &["people.transactionCoordinator"], BLOB_PEOPLE, Text),
    FieldDef::blob("NHD Company", &["people.nhdCompany"], BLOB_PEOPLE, Text),

    // Checklist blob, patched through /checklists
    FieldDef::blob("Loan - LE", &["checklists.loan.le", "checklist-loan.le"], BLOB_CHECKLISTS, Boolean),
    FieldDef::blob("Loan - Rate Locked", &["checklists.loan.lockedRate", "checklist-loan.lockedRate"], BLOB_CHECKLISTS, Boolean),
    FieldDef::blob("Loan - Appraisal Ordered", &["checklists.loan.appraisalOrdered", "checklist-loan.appraisalOrdered"], BLOB_CHECKLISTS, Boolean),
    FieldDef::blob("Loan - Clear to Close", &["checklists.loan.clearToClose", "checklist-loan.clearToClose"], BLOB_CHECKLISTS, Boolean),
    FieldDef::blob("House - EMD", &["checklists.house.emd", "checklist-house.emd"], BLOB_CHECKLISTS, Boolean),
    FieldDef::blob("House - Inspection Ordered", &["checklists.house.homeInspectionOrdered", "checklist-house.homeInspectionOrdered"], BLOB_CHECKLISTS, Boolean),
    FieldDef::blob("House - Disclosures", &["checklists.house.sellerDisclosures", "checklist-house.sellerDisclosures"], BLOB_CHECKLISTS, Boolean),
    FieldDef::blob("Admin - MLS Updated", &["checklists.admin.mlsStatusUpdate", "checklist-admin.mlsStatusUpdate"], BLOB_CHECKLISTS, Boolean),
    FieldDef::blob("Admin - TC Email", &["checklists.admin.tcEmail", "checklist-admin.tcEmail"], BLOB_CHECKLISTS, Boolean),
];

/// Routing for escrow patches
pub fn escrow_routes() -> EntityRoutes {
    EntityRoutes::new(COLLECTION)
        .with_id_prefix(ID_PREFIX)
        .with_sub_resource(BLOB_PEOPLE, BLOB_PEOPLE)
        .with_sub_resource(BLOB_CHECKLISTS, BLOB_CHECKLISTS)
}

/// Build the escrow mapping table
///
/// Construct once at startup and share it (`Arc<FieldMapping>`) with every
/// editor instance.
pub fn escrow_mapping() -> Result<FieldMapping> {
    FieldMapping::from_defs(escrow_routes(), ESCROW_FIELDS)
}
