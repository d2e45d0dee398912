//! Details command implementation.

use clap::Args;

use bookings::reservation::fields;
use bookings::{Error, FormValues};

use crate::error::CliError;
use crate::utils::{with_workflow, GlobalOptions, SessionArgs};

/// Enter the guest's contact details.
#[derive(Args)]
pub struct DetailsCommand {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Guest first name
    #[arg(long, default_value = "")]
    pub first_name: String,

    /// Guest last name
    #[arg(long, default_value = "")]
    pub last_name: String,

    /// Guest email address
    #[arg(long, default_value = "")]
    pub email: String,

    /// Guest phone number
    #[arg(long, default_value = "")]
    pub phone: String,

    /// Room the details are for; must match the selection
    #[arg(long, value_name = "ID")]
    pub room: Option<String>,
}

impl DetailsCommand {
    fn values(&self) -> FormValues {
        let mut values = FormValues::from_pairs([
            (fields::FIRST_NAME, self.first_name.as_str()),
            (fields::LAST_NAME, self.last_name.as_str()),
            (fields::EMAIL, self.email.as_str()),
            (fields::PHONE, self.phone.as_str()),
        ]);
        if let Some(ref room) = self.room {
            values.set(fields::ROOM_ID, room.as_str());
        }
        values
    }

    /// Execute the details command.
    ///
    /// Field problems are listed one per line on stderr before the error
    /// is returned.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let values = self.values();
        with_workflow(global, &self.session, |workflow, _| {
            match workflow.submit_details(&values) {
                Ok(draft) => {
                    if let (false, Some(guest)) = (global.quiet, draft.guest()) {
                        println!(
                            "Details saved for {} ({} for {})",
                            guest.full_name(),
                            draft.room(),
                            draft.stay()
                        );
                    }
                    Ok(())
                }
                Err(Error::Form(errors)) => {
                    for (field, messages) in errors.iter() {
                        for message in messages {
                            eprintln!("  {field}: {message}");
                        }
                    }
                    Err(Error::Form(errors).into())
                }
                Err(e) => Err(e.into()),
            }
        })
    }
}
