use element::ElementNames;

pub trait Show {
    fn show(&self, w: &mut dyn std::fmt::Write, names: &dyn ElementNames) -> std::fmt::Result;

    fn to_shown(&self, names: &dyn ElementNames) -> String {
        let mut message = String::new();
        self.show(&mut message, names).unwrap();
        message
    }

    fn eprintln(self: &Self, names: &dyn ElementNames) {
        eprintln!("{}", self.to_shown(names));
    }
}
