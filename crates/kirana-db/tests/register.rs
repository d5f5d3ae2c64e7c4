//! Checkout, edit and restart behaviour of the Register against a real store.

use chrono::{NaiveDate, NaiveTime};
use kirana_core::{CartLine, CoreError, Item, ItemDraft, LineEdit, OversellPolicy, StockOp};
use kirana_db::{Database, DbConfig, DbError, Register};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn stocked_register(policy: OversellPolicy) -> (Register, Item, Item) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let toor = db
        .catalog()
        .add(ItemDraft::new("TOOR DAL", "KG", 75.0, 60.0))
        .await
        .unwrap();
    let jaggery = db
        .catalog()
        .add(ItemDraft::new("JAGGERY", "KG", 50.0, 40.0))
        .await
        .unwrap();

    let register = Register::with_policy(db, policy);
    register.adjust_stock(toor.id, StockOp::Set, 5.0).await.unwrap();
    register.adjust_stock(jaggery.id, StockOp::Set, 1.0).await.unwrap();

    (register, toor, jaggery)
}

fn sale(toor: &Item, jaggery: &Item) -> Vec<CartLine> {
    vec![
        CartLine::from_item(toor, 2.0),
        CartLine::from_item(jaggery, 1.5),
    ]
}

#[tokio::test]
async fn test_checkout_builds_reconciled_bill() {
    let (register, toor, jaggery) = stocked_register(OversellPolicy::Clamp).await;

    let bill = register
        .checkout_on(&sale(&toor, &jaggery), day(2024, 3, 15))
        .await
        .unwrap();

    assert_eq!(bill.sequence, 1);
    assert_eq!(bill.bill_number, "BILL-001");
    assert_eq!(bill.date_label(), "15-03-2024");
    assert_eq!(
        bill.timestamp,
        day(2024, 3, 15).and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap())
    );
    assert_eq!(bill.items[0].amount, 150.0);
    assert_eq!(bill.items[1].amount, 75.0);
    assert_eq!(bill.total_amount, 225.0);
    assert_eq!(bill.total_cost, 180.0);
    assert_eq!(bill.profit, 45.0);

    let archive = register.load_archive().await.unwrap();
    assert_eq!(archive, vec![bill]);
}

#[tokio::test]
async fn test_checkout_decrements_stock_with_floor() {
    let (register, toor, jaggery) = stocked_register(OversellPolicy::Clamp).await;

    register
        .checkout_on(&sale(&toor, &jaggery), day(2024, 3, 15))
        .await
        .unwrap();

    assert_eq!(register.current_stock(toor.id).await.unwrap(), 3.0);
    assert_eq!(register.current_stock(jaggery.id).await.unwrap(), 0.0);
}

#[tokio::test]
async fn test_rejected_sale_burns_no_number() {
    let (register, toor, jaggery) = stocked_register(OversellPolicy::Reject).await;

    let err = register
        .checkout_on(&sale(&toor, &jaggery), day(2024, 3, 15))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DbError::Domain(CoreError::InsufficientStock { item_id, .. }) if item_id == jaggery.id
    ));

    assert_eq!(register.current_stock(toor.id).await.unwrap(), 5.0);
    assert!(register.load_archive().await.unwrap().is_empty());

    let bill = register
        .checkout_on(&[CartLine::from_item(&toor, 1.0)], day(2024, 3, 15))
        .await
        .unwrap();
    assert_eq!(bill.bill_number, "BILL-001");
}

#[tokio::test]
async fn test_invalid_lines_write_nothing() {
    let (register, toor, jaggery) = stocked_register(OversellPolicy::Clamp).await;

    let zero = CartLine::from_item(&toor, 0.0);
    let negative_rate = CartLine {
        store_rate: -10.0,
        ..CartLine::from_item(&toor, 1.0)
    };
    let nan_cost = CartLine {
        purchase_rate: f64::NAN,
        ..CartLine::from_item(&jaggery, 1.0)
    };

    for lines in [vec![zero], vec![negative_rate], vec![nan_cost]] {
        let err = register.checkout_on(&lines, day(2024, 3, 15)).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
    }

    assert_eq!(register.database().sequencer().stored_counter().await.unwrap(), None);
    assert!(register.load_archive().await.unwrap().is_empty());
    assert_eq!(register.current_stock(toor.id).await.unwrap(), 5.0);
    assert_eq!(register.current_stock(jaggery.id).await.unwrap(), 1.0);
}

#[tokio::test]
async fn test_repeated_item_lines_are_rejected() {
    let (register, toor, _) = stocked_register(OversellPolicy::Clamp).await;

    let lines = [CartLine::from_item(&toor, 1.0), CartLine::from_item(&toor, 2.0)];
    let err = register.checkout_on(&lines, day(2024, 3, 15)).await.unwrap_err();
    assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));

    assert_eq!(register.database().sequencer().stored_counter().await.unwrap(), None);
    assert_eq!(register.current_stock(toor.id).await.unwrap(), 5.0);

    let bill = register
        .checkout_on(&[CartLine::from_item(&toor, 3.0)], day(2024, 3, 15))
        .await
        .unwrap();
    assert_eq!(bill.bill_number, "BILL-001");
    assert_eq!(bill.items.len(), 1);
}

#[tokio::test]
async fn test_sale_without_stock_entry_creates_one() {
    let (register, _, _) = stocked_register(OversellPolicy::Clamp).await;
    let salt = register
        .database()
        .catalog()
        .add(ItemDraft::new("SALT", "PKT", 20.0, 15.0))
        .await
        .unwrap();

    register
        .checkout_on(&[CartLine::from_item(&salt, 2.0)], day(2024, 3, 15))
        .await
        .unwrap();

    let entry = register.database().stock().get(salt.id).await.unwrap().unwrap();
    assert_eq!(entry.item_name, "SALT");
    assert_eq!(entry.quantity, 0.0);
}

#[tokio::test]
async fn test_edit_bill_recomputes_and_replaces() {
    let (register, toor, jaggery) = stocked_register(OversellPolicy::Clamp).await;
    register
        .checkout_on(&sale(&toor, &jaggery), day(2024, 3, 15))
        .await
        .unwrap();

    let edits = [LineEdit {
        item_id: toor.id,
        quantity: Some(3.0),
        ..Default::default()
    }];
    let edited = register
        .edit_bill("BILL-001", &edits, Some(day(2024, 3, 16)))
        .await
        .unwrap();

    assert_eq!(edited.items[0].amount, 225.0);
    assert_eq!(edited.total_amount, 300.0);
    assert_eq!(edited.total_cost, 240.0);
    assert_eq!(edited.profit, 60.0);
    assert_eq!(edited.date_label(), "16-03-2024");
    assert_eq!(edited.timestamp.date(), day(2024, 3, 16));

    assert_eq!(register.bill("BILL-001").await.unwrap(), edited);
}

#[tokio::test]
async fn test_invalid_edit_leaves_bill_untouched() {
    let (register, toor, jaggery) = stocked_register(OversellPolicy::Clamp).await;
    let original = register
        .checkout_on(&sale(&toor, &jaggery), day(2024, 3, 15))
        .await
        .unwrap();

    let bad_quantity = [LineEdit {
        item_id: toor.id,
        quantity: Some(0.0),
        ..Default::default()
    }];
    assert!(register.edit_bill("BILL-001", &bad_quantity, None).await.is_err());

    let missing_line = [LineEdit {
        item_id: 404,
        quantity: Some(1.0),
        ..Default::default()
    }];
    let err = register
        .edit_bill("BILL-001", &missing_line, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Domain(CoreError::LineNotFound { .. })));

    assert_eq!(register.bill("BILL-001").await.unwrap(), original);
}

#[tokio::test]
async fn test_deleted_numbers_are_never_reused() {
    let (register, toor, _) = stocked_register(OversellPolicy::Clamp).await;
    let line = [CartLine::from_item(&toor, 0.5)];

    register.checkout_on(&line, day(2024, 3, 15)).await.unwrap();
    register.checkout_on(&line, day(2024, 3, 15)).await.unwrap();
    register.delete_bill("BILL-002").await.unwrap();

    let err = register.delete_bill("BILL-002").await.unwrap_err();
    assert!(matches!(err, DbError::Domain(CoreError::BillNotFound(_))));

    let next = register.checkout_on(&line, day(2024, 3, 15)).await.unwrap();
    assert_eq!(next.bill_number, "BILL-003");

    let removed = register
        .delete_bills(&["BILL-001", "BILL-003", "BILL-404"])
        .await
        .unwrap();
    assert_eq!(removed, 2);
    assert!(register.load_archive().await.unwrap().is_empty());

    let after_purge = register.checkout_on(&line, day(2024, 3, 16)).await.unwrap();
    assert_eq!(after_purge.bill_number, "BILL-004");
}

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("kirana.db");

    {
        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.catalog().seed_defaults().await.unwrap();
        let register = Register::new(db.clone());
        register.adjust_stock(1, StockOp::Set, 10.0).await.unwrap();
        register.cart_add(1, 2.0).await.unwrap();
        register.checkout_cart_on(day(2024, 3, 15)).await.unwrap();
        register.cart_add(2, 1.0).await.unwrap();
        db.close().await;
    }

    let db = Database::new(DbConfig::new(&path)).await.unwrap();
    let register = Register::new(db);

    assert_eq!(register.load_archive().await.unwrap().len(), 1);
    assert_eq!(register.current_stock(1).await.unwrap(), 8.0);
    assert_eq!(register.cart_view().await.unwrap().len(), 1);

    let bill = register.checkout_cart_on(day(2024, 3, 16)).await.unwrap();
    assert_eq!(bill.bill_number, "BILL-002");
}
