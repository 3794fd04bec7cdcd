use conver_operations::operations::StatusOutput;

use super::format_updates;

pub(crate) trait StatusFormatter {
    fn format_status(&self, output: &StatusOutput) -> String;
}

pub(crate) struct PlainTextStatusFormatter;

impl PlainTextStatusFormatter {
    fn format_packages(output: &mut String, status: &StatusOutput) {
        output.push_str("Packages:\n");
        for package in &status.packages {
            output.push_str(&format!(
                "  {} {} ({})\n",
                package.name,
                package.version,
                package.class.as_str()
            ));
        }
    }

    fn format_base(output: &mut String, status: &StatusOutput) {
        match &status.base {
            Some(base) => output.push_str(&format!("\nBase: {base}\n")),
            None => output.push_str("\nBase: none (the whole history is read)\n"),
        }
    }

    fn format_promotions(output: &mut String, status: &StatusOutput) {
        if status.promotions.is_empty() {
            return;
        }

        output.push_str("\nPromotions:\n");
        for (name, bump) in &status.promotions {
            output.push_str(&format!("  {name}: {bump}\n"));
        }
    }

    fn format_pending(output: &mut String, status: &StatusOutput) {
        if !status.plan.has_changes() {
            output.push_str("\nNo pending version updates.\n");
            return;
        }

        output.push_str("\nPending updates:\n");
        output.push_str(&format_updates(status.plan.changes()));
    }
}

impl StatusFormatter for PlainTextStatusFormatter {
    fn format_status(&self, output: &StatusOutput) -> String {
        let mut result = String::new();
        Self::format_packages(&mut result, output);
        Self::format_base(&mut result, output);
        Self::format_promotions(&mut result, output);
        Self::format_pending(&mut result, output);
        result
    }
}
