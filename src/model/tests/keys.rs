mod parse_slot_key_tests {
    use crate::model::error::store_errors::ParseKeyError;
    use crate::model::{SlotKey, StoreKey};

    #[test]
    fn parse_primary_keys() {
        assert_eq!(
            SlotKey::primary(StoreKey::Fragments),
            "fragments".parse::<SlotKey>().unwrap()
        );
        assert_eq!(
            SlotKey::primary(StoreKey::Tags),
            "tags".parse::<SlotKey>().unwrap()
        );
        assert_eq!(
            SlotKey::primary(StoreKey::DarkMode),
            "darkMode".parse::<SlotKey>().unwrap()
        );
    }

    #[test]
    fn parse_backup_keys() {
        assert_eq!(
            SlotKey::backup_of(StoreKey::DarkMode),
            "backup_darkMode".parse::<SlotKey>().unwrap()
        );
        assert_eq!(
            SlotKey::backup_of(StoreKey::Tags),
            "backup_tags".parse::<SlotKey>().unwrap()
        );
    }

    #[test]
    fn parse_unknown_key() {
        for key in ["darkmode", "backup_", "backup_backup_tags", " tags", "settings"] {
            assert_eq!(
                Err(ParseKeyError::UnknownKey(key.to_string())),
                key.parse::<SlotKey>()
            );
        }
    }

    #[test]
    fn display_matches_parse() {
        for slot in SlotKey::all() {
            assert_eq!(slot, slot.to_string().parse::<SlotKey>().unwrap());
        }
        assert_eq!(6, SlotKey::all().count());
    }

    #[test]
    fn to_backup_is_stable() {
        let backup = SlotKey::primary(StoreKey::Fragments).to_backup();
        assert_eq!("backup_fragments", backup.to_string());
        assert_eq!(backup, backup.to_backup());
    }
}
