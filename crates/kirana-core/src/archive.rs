//! # Bill Archive
//!
//! Ordered collection of finalized bills, keyed by bill number.
//!
//! Bills are kept in the order they were appended. The archive never edits
//! a bill in place: an edit is a full [`BillArchive::replace`] with a bill
//! the reconciler produced.

use crate::error::{CoreError, CoreResult};
use crate::reconcile::normalize;
use crate::record::StoredBill;
use crate::report::DateRange;
use crate::sequence::format_bill_number;
use crate::types::Bill;

/// Finalized bills in append order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BillArchive {
    bills: Vec<Bill>,
}

/// Result of reading an archive from stored records.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedArchive {
    pub archive: BillArchive,
    /// True if any record had to be normalized.
    pub changed: bool,
}

impl BillArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bills(bills: Vec<Bill>) -> Self {
        BillArchive { bills }
    }

    /// Normalizes every stored record.
    ///
    /// One corrupt record fails the whole load, so a caller never persists
    /// an archive with records silently dropped.
    ///
    /// Records whose sequence cannot be recovered (no `sequence`, no digits
    /// in `billNumber`) are numbered past the highest known sequence, in
    /// archive order. A blank `billNumber` is formatted from that sequence.
    pub fn from_stored(records: &[StoredBill]) -> CoreResult<LoadedArchive> {
        let mut bills = Vec::with_capacity(records.len());
        let mut changed = false;

        for record in records {
            let normalized = normalize(record)?;
            changed |= normalized.changed;
            bills.push(normalized.bill);
        }

        let mut last = bills.iter().map(|bill| bill.sequence).max().unwrap_or(0);
        for (bill, record) in bills.iter_mut().zip(records) {
            if bill.sequence != 0 {
                continue;
            }

            last = last.saturating_add(1);
            bill.sequence = last;
            if record.bill_number.trim().is_empty() {
                bill.bill_number = format_bill_number(last);
            }
            changed = true;
        }

        Ok(LoadedArchive {
            archive: BillArchive { bills },
            changed,
        })
    }

    /// The stored form of every bill, in order.
    pub fn to_stored(&self) -> Vec<StoredBill> {
        self.bills.iter().map(StoredBill::from).collect()
    }

    pub fn list(&self) -> &[Bill] {
        &self.bills
    }

    pub fn into_bills(self) -> Vec<Bill> {
        self.bills
    }

    pub fn len(&self) -> usize {
        self.bills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bills.is_empty()
    }

    pub fn get(&self, bill_number: &str) -> Option<&Bill> {
        self.bills.iter().find(|bill| bill.bill_number == bill_number)
    }

    /// Like [`BillArchive::get`], but absence is an error.
    pub fn require(&self, bill_number: &str) -> CoreResult<&Bill> {
        self.get(bill_number)
            .ok_or_else(|| CoreError::BillNotFound(bill_number.to_string()))
    }

    /// Highest sequence in the archive.
    pub fn max_sequence(&self) -> Option<u64> {
        self.bills.iter().map(|bill| bill.sequence).max()
    }

    /// Appends a bill. Bill numbers are unique.
    pub fn append(&mut self, bill: Bill) -> CoreResult<()> {
        if self.get(&bill.bill_number).is_some() {
            return Err(CoreError::DuplicateBill(bill.bill_number));
        }

        self.bills.push(bill);
        Ok(())
    }

    /// Overwrites the bill numbered `bill_number` with `bill`, keeping its
    /// position.
    pub fn replace(&mut self, bill_number: &str, bill: Bill) -> CoreResult<()> {
        let position = self
            .bills
            .iter()
            .position(|b| b.bill_number == bill_number)
            .ok_or_else(|| CoreError::BillNotFound(bill_number.to_string()))?;

        let clashes = self
            .bills
            .iter()
            .enumerate()
            .any(|(i, b)| i != position && b.bill_number == bill.bill_number);
        if clashes {
            return Err(CoreError::DuplicateBill(bill.bill_number));
        }

        self.bills[position] = bill;
        Ok(())
    }

    /// Removes one bill and returns it.
    pub fn remove_one(&mut self, bill_number: &str) -> CoreResult<Bill> {
        let position = self
            .bills
            .iter()
            .position(|b| b.bill_number == bill_number)
            .ok_or_else(|| CoreError::BillNotFound(bill_number.to_string()))?;

        Ok(self.bills.remove(position))
    }

    /// Removes every listed bill that exists. Returns how many were removed.
    pub fn remove_many<S: AsRef<str>>(&mut self, bill_numbers: &[S]) -> usize {
        let before = self.bills.len();
        self.bills.retain(|bill| {
            !bill_numbers
                .iter()
                .any(|number| number.as_ref() == bill.bill_number)
        });
        before - self.bills.len()
    }

    /// Bills whose timestamp falls inside `range`, in archive order.
    pub fn filter_by_date_range(&self, range: &DateRange) -> Vec<&Bill> {
        self.bills
            .iter()
            .filter(|bill| range.contains(bill.timestamp))
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BillLine;
    use chrono::NaiveDate;

    fn bill(sequence: u64, y: i32, m: u32, d: u32) -> Bill {
        Bill::new(
            sequence,
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            vec![BillLine::new(1, "Rice", "KG", 1.0, 100.0, 80.0)],
        )
    }

    fn archive() -> BillArchive {
        BillArchive::from_bills(vec![
            bill(1, 2024, 3, 1),
            bill(2, 2024, 3, 15),
            bill(3, 2024, 4, 2),
        ])
    }

    #[test]
    fn test_append_rejects_duplicate_number() {
        let mut archive = archive();
        assert_eq!(
            archive.append(bill(2, 2024, 5, 1)),
            Err(CoreError::DuplicateBill("BILL-002".to_string()))
        );
        assert_eq!(archive.len(), 3);

        archive.append(bill(4, 2024, 5, 1)).unwrap();
        assert_eq!(archive.max_sequence(), Some(4));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut archive = archive();
        let mut edited = bill(2, 2024, 3, 20);
        edited.items[0] = BillLine::new(1, "Rice", "KG", 3.0, 100.0, 80.0);

        archive.replace("BILL-002", edited.clone()).unwrap();
        assert_eq!(archive.list()[1], edited);

        assert_eq!(
            archive.replace("BILL-099", edited),
            Err(CoreError::BillNotFound("BILL-099".to_string()))
        );
    }

    #[test]
    fn test_replace_rejects_number_clash() {
        let mut archive = archive();
        assert!(matches!(
            archive.replace("BILL-002", bill(3, 2024, 3, 15)),
            Err(CoreError::DuplicateBill(_))
        ));
    }

    #[test]
    fn test_remove_one_and_many() {
        let mut archive = archive();

        let removed = archive.remove_one("BILL-001").unwrap();
        assert_eq!(removed.sequence, 1);
        assert!(archive.remove_one("BILL-001").is_err());

        assert_eq!(archive.remove_many(&["BILL-002", "BILL-404"]), 1);
        assert_eq!(archive.len(), 1);
        // sequences are never reclaimed
        assert_eq!(archive.max_sequence(), Some(3));
    }

    #[test]
    fn test_filter_by_date_range() {
        let archive = archive();

        let march = DateRange::between(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        );
        let april = DateRange::between(
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
        );

        let in_march: Vec<u64> = archive
            .filter_by_date_range(&march)
            .iter()
            .map(|b| b.sequence)
            .collect();
        assert_eq!(in_march, vec![1, 2]);

        let in_april: Vec<u64> = archive
            .filter_by_date_range(&april)
            .iter()
            .map(|b| b.sequence)
            .collect();
        assert_eq!(in_april, vec![3]);
    }

    #[test]
    fn test_from_stored_reports_changes() {
        let archive = archive();
        let loaded = BillArchive::from_stored(&archive.to_stored()).unwrap();
        assert!(!loaded.changed);
        assert_eq!(loaded.archive, archive);

        let mut records = archive.to_stored();
        records[0].sequence = None;
        records[0].total_amount = 1.0;
        let loaded = BillArchive::from_stored(&records).unwrap();
        assert!(loaded.changed);
        assert_eq!(loaded.archive, archive);
    }

    #[test]
    fn test_from_stored_numbers_digitless_records() {
        let record = |bill_number: &str| StoredBill {
            bill_number: bill_number.to_string(),
            date: "15-03-2024".to_string(),
            ..Default::default()
        };
        let records = vec![
            record("CASH"),
            StoredBill::from(&bill(4, 2024, 3, 1)),
            record("CARD"),
        ];

        let loaded = BillArchive::from_stored(&records).unwrap();
        assert!(loaded.changed);
        let numbered: Vec<(&str, u64)> = loaded
            .archive
            .list()
            .iter()
            .map(|b| (b.bill_number.as_str(), b.sequence))
            .collect();
        assert_eq!(numbered, vec![("CASH", 5), ("BILL-004", 4), ("CARD", 6)]);

        let reloaded = BillArchive::from_stored(&loaded.archive.to_stored()).unwrap();
        assert!(!reloaded.changed);
        assert_eq!(reloaded.archive, loaded.archive);
    }

    #[test]
    fn test_from_stored_fails_on_corrupt_record() {
        let mut records = archive().to_stored();
        records[2].date = "garbage".to_string();
        records[2].timestamp = String::new();

        assert!(matches!(
            BillArchive::from_stored(&records),
            Err(CoreError::CorruptBill { .. })
        ));
    }
}
