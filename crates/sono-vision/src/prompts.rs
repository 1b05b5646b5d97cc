//! Instruction text for each kind of vision request.

/// Yes/no question asking whether `entity` is visible.
pub fn identification(entity: &str) -> String {
    format!("Is there a {entity} in this image? Please respond with only 'true' or 'false'.")
}

/// Review of an ultrasound scan that already shows `target_organ`.
pub fn diagnostic(target_organ: &str) -> String {
    format!(
        "You are reviewing an ultrasound scan sent by an astronaut. Write a clear, \
         supportive transcript that evaluates the organ shown in the image.\n\n\
         The target organ appears to be {target_organ}.\n\n\
         Structure the response in three sections:\n\n\
         1. Observations of the Organ\n\
         Describe overall shape, size and texture. Note visible vessels, ducts, \
         chambers or changes in echogenicity, and any landmarks that confirm the \
         organ's identity.\n\n\
         2. Initial Diagnostic Impression\n\
         Say whether the organ looks normal or shows signs of concern such as \
         irregular texture, unclear boundaries or fluid. Suggest further imaging \
         if it is needed.\n\n\
         3. Recommendations\n\
         Give simple next steps such as adjusting the probe, changing the angle or \
         capturing another view. End with a short question confirming the astronaut \
         is ready to continue.\n\n\
         Keep it concise, medically appropriate and easy to follow under stress. \
         Use plain text."
    )
}

/// Read-aloud transcript for moving the probe from the current view to
/// `target_organ`.
pub fn navigation(target_organ: &str) -> String {
    format!(
        "You are an assistant giving real-time spoken instructions to a non-expert \
         astronaut operating an ultrasound system in microgravity. Guide them, step \
         by step, from the area currently imaged to the desired organ. Account for \
         securing equipment and keeping stable.\n\n\
         Desired organ: {target_organ}\n\n\
         Cover these steps:\n\n\
         1. Current image check: confirm the displayed image is stable, then pause \
         briefly.\n\
         2. Preparing the transition: keep skin contact and position the patient.\n\
         3. Probe movement: slow, deliberate movement along a clearly described \
         path (for example 'move upward' or 'shift laterally').\n\
         4. Acquiring the organ: landmarks that show the right window, small \
         angle or rotation adjustments, and depth, gain and frequency settings.\n\
         5. Final check: confirm the organ and its key features are clearly visible.\n\n\
         Use a calm, confident tone and non-technical language. Output a transcript \
         that can be read aloud with each step clearly separated, including the \
         occasional question to confirm understanding."
    )
}
